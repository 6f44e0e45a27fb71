//! Cross-product environments.
//!
//! A [`CrossProduct`] layers a [`CountingRewardMachine`](crate::machine::CountingRewardMachine)
//! on top of a [`GroundEnvironment`]. Each step labels the real ground
//! transition, advances the automaton and replaces the ground reward with
//! the reward bound to the fired rule. The same rule table also drives
//! [`generate_counterfactual_experience`], which turns one real transition
//! into a batch of synthetic ones for off-policy learning.
//!
//! Environments are plain values built by the caller; there is no global
//! registry.

mod counterfactual;
mod environment;
mod error;
mod observation;
mod product;

pub use counterfactual::{
    generate_counterfactual_experience, CounterfactualBatch, Experience, ExperienceInfo,
    SkippedCombination,
};
pub use environment::{GroundEnvironment, GroundStep, LabellingFunction};
pub use error::{BoxError, CrossProductError};
pub use observation::{ObservationComposer, OneHotComposer, ProductComposer, ProductObservation};
pub use product::{CrossProduct, CrossProductConfig, ProductStep, StepInfo};
