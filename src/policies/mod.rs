//! Selection policies for the k-armed bandit problem
//!
//! Every policy implements [`Policy`] over a private [`PolicyState`].
//! UCB1 and UCB2 pull each arm once before scoring (see
//! [`cold_start_arm`]); the sampling policies are well defined from the
//! first step and skip that phase.
//!
//! [`PolicyState`]: crate::state::PolicyState
//! [`cold_start_arm`]: crate::state::cold_start_arm

mod epsilon_greedy;
mod gradient;
mod softmax;
mod ucb1;
mod ucb2;

pub use crate::policy::Policy;
pub use epsilon_greedy::EpsilonGreedy;
pub use gradient::GradientPreference;
pub use softmax::Softmax;
pub use ucb1::Ucb1;
pub use ucb2::Ucb2;
