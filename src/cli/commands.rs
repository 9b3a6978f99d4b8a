// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and all
// their flags. The train flags are the run's parameter cells:
// vocabulary size, max length, batch size, epochs, step counts,
// learning rate and layer widths.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::config::PipelineConfig;
use crate::infra::metrics::TrackedMetric;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the classifier and keep the best checkpoint
    Train(TrainArgs),

    /// Score one review with the best checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing train.jsonl and test.jsonl
    #[arg(long, default_value = "data/reviews")]
    pub data_dir: String,

    /// Use a seeded synthetic corpus instead of --data-dir
    #[arg(long)]
    pub synthetic: bool,

    /// Synthetic train partition size
    #[arg(long, default_value_t = 512)]
    pub synthetic_train: usize,

    /// Synthetic eval partition size
    #[arg(long, default_value_t = 128)]
    pub synthetic_eval: usize,

    /// Directory for the checkpoint, config and metrics CSV
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Checkpoint is saved as <model-name>_best_loss
    #[arg(long, default_value = "sentiment")]
    pub model_name: String,

    /// Keep only this many of the most frequent words
    #[arg(long, default_value_t = 10_000)]
    pub vocab_size: usize,

    /// Reviews longer than this are dropped, shorter ones padded
    #[arg(long, default_value_t = 500)]
    pub max_len: usize,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    /// Train batches per epoch (default: whole partition)
    #[arg(long)]
    pub train_steps: Option<usize>,

    /// Eval batches per epoch (default: whole partition)
    #[arg(long)]
    pub eval_steps: Option<usize>,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Metrics shown per epoch: loss, accuracy (repeatable)
    #[arg(long = "metric", default_values_t = [TrackedMetric::Accuracy])]
    pub metrics: Vec<TrackedMetric>,

    #[arg(long, default_value_t = 32)]
    pub embedding_dim: usize,

    #[arg(long, default_value_t = 32)]
    pub conv_filters: usize,

    #[arg(long, default_value_t = 3)]
    pub kernel_size: usize,

    #[arg(long, default_value_t = 2)]
    pub pool_size: usize,

    /// GRU hidden size
    #[arg(long, default_value_t = 32)]
    pub hidden_dim: usize,

    /// Width of the first dense layer
    #[arg(long, default_value_t = 16)]
    pub dense_dim: usize,
}

/// Convert CLI TrainArgs into the application-layer PipelineConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for PipelineConfig {
    fn from(a: TrainArgs) -> Self {
        PipelineConfig {
            data_dir:        a.data_dir,
            synthetic:       a.synthetic,
            synthetic_train: a.synthetic_train,
            synthetic_eval:  a.synthetic_eval,
            vocab_size:      a.vocab_size,
            max_len:         a.max_len,
            checkpoint_dir:  a.checkpoint_dir,
            model_name:      a.model_name,
            batch_size:      a.batch_size,
            epochs:          a.epochs,
            train_steps:     a.train_steps,
            eval_steps:      a.eval_steps,
            lr:              a.lr,
            seed:            a.seed,
            metrics:         a.metrics,
            embedding_dim:   a.embedding_dim,
            conv_filters:    a.conv_filters,
            kernel_size:     a.kernel_size,
            pool_size:       a.pool_size,
            hidden_dim:      a.hidden_dim,
            dense_dim:       a.dense_dim,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory where `train` saved the checkpoint
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Override the dataset directory recorded at training time
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Which eval review to score
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Score these comma-separated token ids instead of an eval review
    #[arg(long, value_delimiter = ',', conflicts_with = "index")]
    pub tokens: Option<Vec<u32>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_pipeline_defaults() {
        let cli = Cli::try_parse_from(["review-sentiment", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(PipelineConfig::from(args), PipelineConfig::default());
    }

    #[test]
    fn test_train_flags_reach_config() {
        let cli = Cli::try_parse_from([
            "review-sentiment", "train",
            "--synthetic", "--max-len", "80", "--train-steps", "5",
            "--metric", "loss", "--metric", "accuracy",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = PipelineConfig::from(args);
        assert!(cfg.synthetic);
        assert_eq!(cfg.max_len, 80);
        assert_eq!(cfg.train_steps, Some(5));
        assert_eq!(cfg.metrics, vec![TrackedMetric::Loss, TrackedMetric::Accuracy]);
    }

    #[test]
    fn test_predict_parses_token_list() {
        let cli = Cli::try_parse_from(["review-sentiment", "predict", "--tokens", "1,14,22"]).unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.tokens, Some(vec![1, 14, 22]));
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        assert!(Cli::try_parse_from(["review-sentiment", "train", "--metric", "f1"]).is_err());
    }
}
