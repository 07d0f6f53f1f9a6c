// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Resolves and loads the model artifact for the configured
// kind. One path convention per family, resolved once:
//
//   logistic   MODEL_PATH = logistic_regression_model.json
//              <dir>/tfidf_vectorizer.json
//
//   lstm/cnn   MODEL_PATH = <stem>.mpk(.gz)   (burn record)
//              <stem>_config.json             (architecture)
//              <stem>_tokenizer.json          (Keras word index)
//
//   bert       MODEL_PATH = <dir>/
//              <dir>/model.mpk(.gz)           (burn record)
//              <dir>/config.json              (architecture)
//              <dir>/tokenizer.json           (HuggingFace)
//
// Loading is all-or-nothing: every file must exist, parse, and
// agree with its partner (vocabulary fits the embedding, idf
// width = coefficient width) before an adapter is returned.
//
// Burn's CompactRecorder restores the weights into a module
// rebuilt from the saved config. load_record does not compare
// shapes, so every restored parameter is checked against the
// config before the adapter exists: a record saved for another
// vocabulary or width fails here, not at request time.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::path::{Path, PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};
use serde::de::DeserializeOwned;

use crate::data::subword::{SubwordEncoder, MAX_SEQ_LEN};
use crate::data::tfidf::{TfidfParams, TfidfVectorizer};
use crate::data::word_index::WordIndex;
use crate::domain::error::LoadError;
use crate::domain::model_kind::{ModelFamily, ModelKind};
use crate::infra::tokenizer_store::{load_json_artifact, load_subword_tokenizer, max_token_id};
use crate::ml::adapter::PredictionAdapter;
use crate::ml::linear::{LinearPredictor, LogisticRegression};
use crate::ml::sequence::{SequenceArchitecture, SequenceClassifierConfig, SequencePredictor};
use crate::ml::transformer::{TransformerClassifierConfig, TransformerPredictor};
use crate::ml::InferBackend;

/// Vectorizer file next to the logistic model
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
/// Record stem inside a transformer directory
pub const TRANSFORMER_RECORD: &str = "model";
pub const TRANSFORMER_CONFIG_FILE: &str = "config.json";
pub const TRANSFORMER_TOKENIZER_FILE: &str = "tokenizer.json";

/// Extension CompactRecorder appends to a record stem
pub fn record_extension() -> &'static str {
    <CompactRecorder as FileRecorder<InferBackend>>::file_extension()
}

/// `lstm_model.mpk.gz` → `lstm_model`; a bare stem is kept as is
fn record_stem(path: &Path) -> PathBuf {
    let suffix = format!(".{}", record_extension());
    let raw = path.to_string_lossy();
    match raw.strip_suffix(suffix.as_str()) {
        Some(stem) => PathBuf::from(stem),
        None       => path.to_path_buf(),
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{suffix}", stem.display()))
}

/// The files one artifact is made of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Weights or coefficients
    pub classifier: PathBuf,
    /// Architecture config (neural families only)
    pub config:     Option<PathBuf>,
    /// Tokenizer, word index or vectorizer
    pub auxiliary:  PathBuf,
}

impl ArtifactPaths {
    fn all(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.classifier)
            .chain(self.config.as_ref())
            .chain(std::iter::once(&self.auxiliary))
    }

    /// Every file with the part it plays, in load order
    pub fn with_roles(&self) -> Vec<(&'static str, &Path)> {
        let mut files = vec![("classifier", self.classifier.as_path())];
        if let Some(config) = &self.config {
            files.push(("config", config.as_path()));
        }
        files.push(("transform", self.auxiliary.as_path()));
        files
    }
}

pub struct ArtifactStore {
    kind: ModelKind,
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(kind: ModelKind, path: impl Into<PathBuf>) -> Self {
        Self { kind, path: path.into() }
    }

    pub fn paths(&self) -> ArtifactPaths {
        match self.kind.family() {
            ModelFamily::LinearClassifier => ArtifactPaths {
                classifier: self.path.clone(),
                config:     None,
                auxiliary:  self
                    .path
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(VECTORIZER_FILE),
            },
            ModelFamily::SequenceClassifier => {
                let stem = record_stem(&self.path);
                ArtifactPaths {
                    classifier: with_suffix(&stem, &format!(".{}", record_extension())),
                    config:     Some(with_suffix(&stem, "_config.json")),
                    auxiliary:  with_suffix(&stem, "_tokenizer.json"),
                }
            }
            ModelFamily::TransformerClassifier => ArtifactPaths {
                classifier: self
                    .path
                    .join(format!("{TRANSFORMER_RECORD}.{}", record_extension())),
                config:     Some(self.path.join(TRANSFORMER_CONFIG_FILE)),
                auxiliary:  self.path.join(TRANSFORMER_TOKENIZER_FILE),
            },
        }
    }

    /// Load every file of the artifact and build the adapter.
    pub fn load<B: Backend>(&self, device: B::Device) -> Result<PredictionAdapter<B>, LoadError> {
        let paths = self.paths();
        if let Some(missing) = paths.all().find(|p| !p.is_file()) {
            return Err(LoadError::ArtifactMissing(missing.clone()));
        }

        tracing::info!(
            "Loading {} artifact from '{}'",
            self.kind,
            self.path.display()
        );

        let adapter = match self.kind.family() {
            ModelFamily::LinearClassifier      => self.load_linear(&paths)?,
            ModelFamily::SequenceClassifier    => self.load_sequence(&paths, device)?,
            ModelFamily::TransformerClassifier => self.load_transformer(&paths, device)?,
        };

        tracing::info!("{} artifact ready ({:?})", self.kind, adapter.family());
        Ok(adapter)
    }

    fn load_linear<B: Backend>(&self, paths: &ArtifactPaths) -> Result<PredictionAdapter<B>, LoadError> {
        let params: TfidfParams = load_json_artifact(&paths.auxiliary)?;
        let vectorizer = TfidfVectorizer::new(params)?;
        let model: LogisticRegression = load_json_artifact(&paths.classifier)?;
        Ok(PredictionAdapter::Linear(LinearPredictor::new(vectorizer, model)?))
    }

    fn load_sequence<B: Backend>(
        &self,
        paths:  &ArtifactPaths,
        device: B::Device,
    ) -> Result<PredictionAdapter<B>, LoadError> {
        let config: SequenceClassifierConfig = read_config(paths)?;

        let expected = match self.kind {
            ModelKind::Cnn => SequenceArchitecture::Cnn,
            _              => SequenceArchitecture::Lstm,
        };
        if config.architecture != expected {
            return Err(LoadError::incompatible(format!(
                "configured model type is {} but the saved architecture is {:?}",
                self.kind, config.architecture
            )));
        }
        if !matches!(config.output_units, 1 | 2) {
            return Err(LoadError::incompatible(format!(
                "sequence head has {} outputs, expected 1 or 2",
                config.output_units
            )));
        }
        if config.embedding_dim == 0 || config.hidden_size == 0 {
            return Err(LoadError::incompatible("sequence model has a zero-width layer"));
        }
        if config.architecture == SequenceArchitecture::Cnn
            && !(1..=MAX_SEQ_LEN).contains(&config.kernel_size)
        {
            return Err(LoadError::incompatible(format!(
                "CNN kernel size {} does not fit a {MAX_SEQ_LEN}-token sequence",
                config.kernel_size
            )));
        }

        let word_index: WordIndex = load_json_artifact(&paths.auxiliary)?;
        if word_index.max_index() as usize >= config.vocab_size {
            return Err(LoadError::incompatible(format!(
                "word index reaches {} but the embedding has {} rows",
                word_index.max_index(),
                config.vocab_size
            )));
        }

        let model  = config.init::<B>(&device);
        let record = CompactRecorder::new()
            .load(record_stem(&paths.classifier), &device)
            .map_err(|e| LoadError::incompatible(format!(
                "cannot restore '{}': {e:?}", paths.classifier.display()
            )))?;
        let model = model.load_record(record);
        model.check_shapes(&config)?;

        Ok(PredictionAdapter::Sequence(SequencePredictor::new(
            model, word_index, MAX_SEQ_LEN, device,
        )))
    }

    fn load_transformer<B: Backend>(
        &self,
        paths:  &ArtifactPaths,
        device: B::Device,
    ) -> Result<PredictionAdapter<B>, LoadError> {
        let config: TransformerClassifierConfig = read_config(paths)?;

        if config.num_classes != 2 {
            return Err(LoadError::incompatible(format!(
                "transformer head has {} classes, expected 2", config.num_classes
            )));
        }
        if config.max_seq_len < MAX_SEQ_LEN {
            return Err(LoadError::incompatible(format!(
                "transformer covers {} positions, inputs are {MAX_SEQ_LEN} tokens",
                config.max_seq_len
            )));
        }
        if config.num_heads == 0 || config.d_model % config.num_heads != 0 {
            return Err(LoadError::incompatible(format!(
                "d_model {} is not divisible by {} heads",
                config.d_model, config.num_heads
            )));
        }

        let tokenizer = load_subword_tokenizer(&paths.auxiliary)?;
        let max_id = max_token_id(&tokenizer) as usize;
        if max_id >= config.vocab_size {
            return Err(LoadError::incompatible(format!(
                "tokenizer emits id {max_id} but the embedding has {} rows",
                config.vocab_size
            )));
        }

        let model  = config.init::<B>(&device);
        let record = CompactRecorder::new()
            .load(record_stem(&paths.classifier), &device)
            .map_err(|e| LoadError::incompatible(format!(
                "cannot restore '{}': {e:?}", paths.classifier.display()
            )))?;
        let model = model.load_record(record);
        model.check_shapes(&config)?;

        Ok(PredictionAdapter::Transformer(TransformerPredictor::new(
            model,
            SubwordEncoder::new(tokenizer, MAX_SEQ_LEN),
            device,
        )))
    }
}

/// Architecture config saved next to the record
fn read_config<C: DeserializeOwned>(paths: &ArtifactPaths) -> Result<C, LoadError> {
    let path = paths
        .config
        .as_ref()
        .ok_or_else(|| LoadError::incompatible("neural artifact has no config file"))?;
    let json = std::fs::read_to_string(path).map_err(|e| {
        LoadError::incompatible(format!("cannot read '{}': {e}", path.display()))
    })?;
    serde_json::from_str(&json).map_err(|e| {
        LoadError::incompatible(format!("cannot parse '{}': {e}", path.display()))
    })
}
