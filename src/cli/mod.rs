// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and dispatches to
// the use cases in Layer 2. All printing for the user happens
// here; the layers below only log.
//
// Two commands are supported:
//   1. `train`   — trains the model and keeps the best checkpoint
//   2. `predict` — loads the checkpoint and scores one review
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "review-sentiment",
    version = "0.1.0",
    about = "Train a conv + GRU sentiment classifier on encoded movie reviews, then score a review."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => Self::run_train(args),
            Commands::Predict(args) => Self::run_predict(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        let use_case = TrainUseCase::new(args.into());
        let report   = use_case.execute()?;

        match (report.best_epoch, report.best_eval_loss) {
            (Some(epoch), Some(loss)) => println!(
                "Training complete. Best epoch {epoch} (eval_loss={loss:.4}) saved to {}",
                report.checkpoint.display()
            ),
            _ => println!("Training complete. No checkpoint was written."),
        }
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(&args.checkpoint_dir, args.data_dir)?;

        match args.tokens {
            Some(tokens) => {
                let p = use_case.score_tokens(&tokens)?;
                println!("score={:.6}", p.score);
            }
            None => {
                let p = use_case.score_eval_sample(args.index)?;
                match p.label {
                    Some(label) => println!("eval[{}] score={:.6} label={}", args.index, p.score, label),
                    None        => println!("eval[{}] score={:.6}", args.index, p.score),
                }
            }
        }
        Ok(())
    }
}
