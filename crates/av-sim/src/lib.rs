//! `av-sim` — vehicle agents and the fixed-tick loop.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Agents     : in ascending AgentId order:
//!                    clear own reservation
//!                    Driver::update   (sees everyone's current claims)
//!                    register the new reservation
//!                    Drivetrain::step (writes wheel commands to the body)
//!   ② Events     : driver events are forwarded to the SimObserver.
//!   ③ Integrate  : SimBody::integrate on every body.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`agent`]    | `VehicleAgent<B>`, `AgentSpec`                        |
//! | [`body`]     | `SimBody`, `KinematicBody`                            |
//! | [`builder`]  | `SimBuilder<B>`                                       |
//! | [`sim`]      | `Sim<B>`                                              |
//! | [`observer`] | `SimObserver`, `NoopObserver`                         |
//! | [`error`]    | `SimError`, `SimResult<T>`                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use av_core::{SimConfig, Vec3};
//! use av_sim::{AgentSpec, KinematicBody, NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), graph)
//!     .agent(AgentSpec::default(), KinematicBody::at(Vec3::ZERO, Vec3::Z))
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod agent;
pub mod body;
pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use agent::{AgentSpec, VehicleAgent};
pub use body::{KinematicBody, SimBody};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
