//! Validation engine for climate action proposals.
//!
//! A proposal first passes a local structural gate. If it holds, four
//! coherence axes run concurrently:
//!
//! 1. **Physical**: the validate capability judges the CO2 mechanism and
//!    figures. Degrades to a blocking `validation_unavailable` when the
//!    capability fails.
//! 2. **Economic**: cost per tonne over ten years against per-domain bands.
//! 3. **Temporal**: timeline bound and phase plan consistency.
//! 4. **References**: weighted count of vetted, recent sources. The optional
//!    capability review runs after the physical call.
//!
//! Scores are combined by weighted mean. A verdict is approved only when it
//! carries no blocking issue and its score reaches the approval threshold.

pub mod axes;
pub mod config;
pub mod engine;
pub mod error;
pub mod recommendations;
pub mod structural;

pub use axes::AxisOutcome;
pub use config::{
    AxisWeights, CostBands, CostThresholdTable, PhysicalReviewConfig, ReferencePolicy,
    ValidationConfig,
};
pub use engine::{ValidationEngine, Validator};
pub use error::{ValidationError, ValidationResult};
pub use structural::STRUCTURE_ISSUE_PREFIX;
