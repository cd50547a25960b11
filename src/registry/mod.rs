//! # Registry Infrastructure
//!
//! Capability-keyed registration of statically wired components.
//!
//! ## Overview
//!
//! Application wiring binds implementations against typed [`Capability`]
//! keys on a [`ContributionRegistryBuilder`]. The built
//! [`ContributionRegistry`] is then handed by reference to the services that
//! consume those capabilities; there is no process-global lookup.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── Capability<T>                (typed key)
//! ├── ContributionRegistryBuilder  (bind factories during wiring)
//! ├── ContributionRegistry         (frozen capability → provider map)
//! └── ContributionProvider<T>      (ordered, lazily instantiated contributions)
//! ```

pub mod contribution;

pub use contribution::{
    Capability, ContributionProvider, ContributionRegistry, ContributionRegistryBuilder,
    StaticContributionProvider,
};
