// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the file system or the network on
// behalf of the other layers:
//
//   tokenizer_store.rs — Reading the auxiliary transforms
//                        (HuggingFace tokenizer, Keras word
//                        index, TF-IDF vectorizer) and any
//                        other JSON artifact, mapped onto the
//                        load error taxonomy.
//
//   artifact_store.rs  — Path conventions per model family and
//                        the all-or-nothing artifact load.
//                        Uses Burn's CompactRecorder to restore
//                        the neural weights.
//
//   analytics.rs       — PostHog capture client implementing
//                        the FeedbackSink trait.
//
//   api_client.rs      — reqwest client for the HTTP API, used
//                        by the dashboard-side commands.
//
//   batch_file.rs      — Tweet lists in (plain text or CSV) and
//                        prediction tables out (CSV) for the
//                        `batch` command.
//
// Why is this a separate layer?
//   The service and the adapter stay testable with in-memory
//   artifacts, and the HTTP/analytics endpoints can be swapped
//   for local stand-ins in tests.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Records)

/// Tokenizer and JSON artifact reading
pub mod tokenizer_store;

/// Model artifact path resolution and loading
pub mod artifact_store;

/// PostHog feedback sink
pub mod analytics;

/// HTTP client for the sentiment API
pub mod api_client;

/// Batch command input and CSV export
pub mod batch_file;
