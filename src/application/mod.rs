// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal at a time.
//
// Rules for this layer:
//   - No ML math or model code here (that's Layer 5)
//   - No printing or HTTP routing (that's Layer 1)
//   - No direct file or network access (that's Layer 6)
//   - Only workflow coordination
//
//   prediction_service.rs — server side: model lifecycle,
//                           validation, response shaping
//   review_use_case.rs    — dashboard side: status, review
//                           with feedback, batch summary
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The load-once / read-many prediction workflow
pub mod prediction_service;

// The dashboard-side review and feedback workflow
pub mod review_use_case;
