//! Hand landmarks and the providers that produce them.

pub mod noop;
pub mod provider;
pub mod replay;
pub mod types;

pub use noop::NoopProvider;
pub use provider::{
    Delegate, DetectedHand, Detection, LandmarkProvider, ProviderError, ProviderOptions,
};
pub use replay::ReplayProvider;
pub use types::{
    Finger, HandObservation, LandmarkError, LandmarkPoint, LANDMARK_COUNT, RELEVANT_LANDMARKS,
};
