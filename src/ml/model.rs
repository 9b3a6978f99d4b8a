use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        gru::{Gru, GruConfig},
        pool::{MaxPool1d, MaxPool1dConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        PaddingConfig1d,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

use crate::domain::error::PipelineError;

// Keeps log() finite when the sigmoid saturates.
const PROB_EPS: f64 = 1e-7;

#[derive(Config, Debug)]
pub struct SentimentConfig {
    pub vocab_size:    usize,
    pub max_len:       usize,
    #[config(default = 32)]
    pub embedding_dim: usize,
    #[config(default = 32)]
    pub conv_filters:  usize,
    #[config(default = 3)]
    pub kernel_size:   usize,
    #[config(default = 2)]
    pub pool_size:     usize,
    #[config(default = 32)]
    pub hidden_dim:    usize,
    #[config(default = 16)]
    pub dense_dim:     usize,
}

impl SentimentConfig {
    /// Number of time steps the recurrent layer sees after
    /// convolution (valid padding) and pooling (stride = pool_size).
    pub fn pooled_len(&self) -> usize {
        let conv_len = (self.max_len + 1).saturating_sub(self.kernel_size);
        if self.pool_size == 0 || conv_len < self.pool_size {
            return 0;
        }
        (conv_len - self.pool_size) / self.pool_size + 1
    }

    /// Reject settings whose shapes collapse to nothing.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let dims = [
            ("vocab_size", self.vocab_size),
            ("max_len", self.max_len),
            ("embedding_dim", self.embedding_dim),
            ("conv_filters", self.conv_filters),
            ("kernel_size", self.kernel_size),
            ("pool_size", self.pool_size),
            ("hidden_dim", self.hidden_dim),
            ("dense_dim", self.dense_dim),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, v)| *v == 0) {
            return Err(PipelineError::InvalidConfig(format!("{name} must be > 0")));
        }
        if self.max_len < self.kernel_size {
            return Err(PipelineError::InvalidConfig(format!(
                "max_len ({}) is shorter than kernel_size ({})",
                self.max_len, self.kernel_size
            )));
        }
        let conv_len = self.max_len + 1 - self.kernel_size;
        if conv_len < self.pool_size {
            return Err(PipelineError::InvalidConfig(format!(
                "convolved length ({conv_len}) is shorter than pool_size ({})",
                self.pool_size
            )));
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentModel<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        let conv = Conv1dConfig::new(self.embedding_dim, self.conv_filters, self.kernel_size)
            .with_padding(PaddingConfig1d::Valid)
            .init(device);
        let pool = MaxPool1dConfig::new(self.pool_size)
            .with_stride(self.pool_size)
            .init();
        let gru    = GruConfig::new(self.conv_filters, self.hidden_dim, true).init(device);
        let dense  = LinearConfig::new(self.hidden_dim, self.dense_dim).init(device);
        let output = LinearConfig::new(self.dense_dim, 1).init(device);
        SentimentModel { embedding, conv, pool, gru, dense, output }
    }
}

/// embedding → conv1d → max pool → GRU → dense → dense(1) + sigmoid
#[derive(Module, Debug)]
pub struct SentimentModel<B: Backend> {
    pub embedding: Embedding<B>,
    pub conv:      Conv1d<B>,
    pub pool:      MaxPool1d,
    pub gru:       Gru<B>,
    pub dense:     Linear<B>,
    pub output:    Linear<B>,
}

pub struct SentimentOutput<B: Backend> {
    /// Mean binary cross-entropy over the batch
    pub loss:  Tensor<B, 1>,
    /// Sigmoid scores, [batch, 1]
    pub probs: Tensor<B, 2>,
}

impl<B: Backend> SentimentModel<B> {
    /// inputs: [batch, max_len] → sigmoid scores: [batch, 1]
    pub fn forward(&self, inputs: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x = self.embedding.forward(inputs); // [batch, len, emb]

        // Conv1d wants channels first.
        let x = relu(self.conv.forward(x.swap_dims(1, 2))); // [batch, filters, len']
        let x = self.pool.forward(x).swap_dims(1, 2);        // [batch, steps, filters]

        let hidden = self.gru.forward(x, None);              // [batch, steps, hidden]
        let [batch, steps, d_hidden] = hidden.dims();
        let last = hidden
            .slice([0..batch, steps - 1..steps, 0..d_hidden])
            .reshape([batch, d_hidden]);

        let x = relu(self.dense.forward(last));
        sigmoid(self.output.forward(x))
    }

    /// Forward pass bound to the binary cross-entropy loss.
    /// `labels` must already be reshaped to [batch, 1].
    pub fn forward_loss(
        &self,
        inputs: Tensor<B, 2, Int>,
        labels: Tensor<B, 2, Int>,
    ) -> Result<SentimentOutput<B>, PipelineError> {
        let probs = self.forward(inputs);
        let (got, want) = (probs.dims(), labels.dims());
        if got != want {
            return Err(PipelineError::ShapeMismatch {
                context:  "model output vs labels",
                expected: want.to_vec(),
                actual:   got.to_vec(),
            });
        }
        let loss = binary_cross_entropy(probs.clone(), labels.float());
        Ok(SentimentOutput { loss, probs })
    }
}

/// -[y·log(p) + (1-y)·log(1-p)], averaged over every element.
pub fn binary_cross_entropy<B: Backend>(probs: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let probs = probs.clamp(PROB_EPS, 1.0 - PROB_EPS);
    let pos = targets.clone() * probs.clone().log();
    let neg = targets.neg().add_scalar(1.0) * probs.neg().add_scalar(1.0).log();
    (pos + neg).neg().mean()
}

/// Rows whose score lands on the same side of 0.5 as their label.
pub fn count_correct<B: Backend>(probs: Tensor<B, 2>, labels: Tensor<B, 2, Int>) -> usize {
    let predicted = probs.greater_elem(0.5).int();
    let correct: i64 = predicted.equal(labels).int().sum().into_scalar().elem::<i64>();
    correct as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn tiny_config() -> SentimentConfig {
        SentimentConfig::new(20, 10)
            .with_embedding_dim(8)
            .with_conv_filters(8)
            .with_hidden_dim(8)
            .with_dense_dim(4)
    }

    #[test]
    fn test_pooled_len() {
        // 10 - 3 + 1 = 8 after conv, 8 / 2 = 4 after pooling
        assert_eq!(tiny_config().pooled_len(), 4);
        assert_eq!(SentimentConfig::new(100, 500).pooled_len(), 249);
    }

    #[test]
    fn test_validate_rejects_short_sequences() {
        let cfg = tiny_config().with_kernel_size(11);
        assert!(matches!(cfg.validate(), Err(PipelineError::InvalidConfig(_))));

        let cfg = tiny_config().with_pool_size(9);
        assert!(matches!(cfg.validate(), Err(PipelineError::InvalidConfig(_))));

        let cfg = tiny_config().with_hidden_dim(0);
        assert!(cfg.validate().is_err());

        assert!(tiny_config().validate().is_ok());
    }

    #[test]
    fn test_forward_gives_one_probability_per_row() {
        let device = Default::default();
        let model = tiny_config().init::<TestBackend>(&device);
        let inputs = Tensor::<TestBackend, 2, Int>::zeros([3, 10], &device);

        let probs = model.forward(inputs);
        assert_eq!(probs.dims(), [3, 1]);

        let values = probs.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_forward_loss_rejects_flat_labels() {
        let device = Default::default();
        let model = tiny_config().init::<TestBackend>(&device);
        let inputs = Tensor::<TestBackend, 2, Int>::zeros([2, 10], &device);
        // [1, 2] instead of the reshaped [2, 1]
        let labels = Tensor::<TestBackend, 2, Int>::zeros([1, 2], &device);

        let err = model.forward_loss(inputs, labels).err().unwrap();
        assert!(matches!(err, PipelineError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_bce_is_small_for_confident_correct_scores() {
        let device = Default::default();
        let probs   = Tensor::<TestBackend, 2>::from_floats([[0.99], [0.01]], &device);
        let targets = Tensor::<TestBackend, 2>::from_floats([[1.0], [0.0]], &device);
        let loss: f32 = binary_cross_entropy(probs, targets).into_scalar().elem();
        assert!(loss < 0.02, "loss = {loss}");
    }

    #[test]
    fn test_count_correct_thresholds_at_half() {
        let device = Default::default();
        let probs  = Tensor::<TestBackend, 2>::from_floats([[0.9], [0.2], [0.6]], &device);
        let labels = Tensor::<TestBackend, 2, Int>::from_ints([[1], [1], [0]], &device);
        assert_eq!(count_correct(probs, labels), 1);
    }
}
