//! # Contribution Registry
//!
//! Capability-keyed registration of statically wired implementations.
//!
//! ## Overview
//!
//! Components that want to contribute an implementation of some capability
//! (for example an open handler) bind a factory against a typed
//! [`Capability`] key while the application is being assembled. Once built,
//! the [`ContributionRegistry`] is passed by reference to whoever needs the
//! contributions, which it hands out as a [`ContributionProvider`].
//!
//! ## Key Features
//!
//! - **Typed keys**: a `Capability<T>` can only be bound with `T` factories
//! - **Registration order**: contributions come back in the order they were bound
//! - **Lazy singletons**: each factory runs once, on the first query
//! - **No global state**: registries are plain values owned by the caller
//!
//! ## Usage
//!
//! ```rust
//! use opener_core::registry::{Capability, ContributionProvider, ContributionRegistry};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! const GREETER: Capability<dyn Greeter> = Capability::new("Greeter");
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ContributionRegistry::builder()
//!     .bind(GREETER, || Arc::new(English) as Arc<dyn Greeter>)
//!     .build();
//!
//! let provider = registry.provider(GREETER)?;
//! let greetings: Vec<String> = provider.get_contributions().iter().map(|g| g.greet()).collect();
//! assert_eq!(greetings, vec!["hello"]);
//! # Ok(())
//! # }
//! ```

use crate::error::{OpenerError, OpenerResult};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Typed key naming a capability.
pub struct Capability<T: ?Sized> {
    name: &'static str,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> Capability<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Capability<T> {}

impl<T: ?Sized> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Capability").field(&self.name).finish()
    }
}

/// Yields every registered implementation of a capability.
pub trait ContributionProvider<T: ?Sized>: Send + Sync {
    /// Contributions in registration order.
    fn get_contributions(&self) -> Vec<Arc<T>>;
}

type ContributionFactory<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

/// Provider over a fixed, ordered list of factories.
///
/// Factories are invoked together on the first call to
/// [`get_contributions`](ContributionProvider::get_contributions); later calls
/// return the same instances.
pub struct StaticContributionProvider<T: ?Sized> {
    factories: Vec<ContributionFactory<T>>,
    instances: OnceLock<Vec<Arc<T>>>,
}

impl<T: ?Sized + 'static> StaticContributionProvider<T> {
    fn from_factories(factories: Vec<ContributionFactory<T>>) -> Self {
        Self {
            factories,
            instances: OnceLock::new(),
        }
    }

    /// Provider over ready-made instances.
    pub fn from_instances(instances: Vec<Arc<T>>) -> Self {
        Self {
            factories: Vec::new(),
            instances: OnceLock::from(instances),
        }
    }

    pub fn empty() -> Self {
        Self::from_instances(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self.instances.get() {
            Some(instances) => instances.len(),
            None => self.factories.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + Send + Sync + 'static> ContributionProvider<T> for StaticContributionProvider<T> {
    fn get_contributions(&self) -> Vec<Arc<T>> {
        self.instances
            .get_or_init(|| {
                debug!(count = self.factories.len(), "Instantiating contributions");
                self.factories.iter().map(|factory| factory()).collect()
            })
            .clone()
    }
}

impl<T: ?Sized> fmt::Debug for StaticContributionProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticContributionProvider")
            .field("factories", &self.factories.len())
            .field("instantiated", &self.instances.get().is_some())
            .finish()
    }
}

/// Immutable mapping from capability name to its ordered providers.
#[derive(Default)]
pub struct ContributionRegistry {
    // Each value is an `Arc<StaticContributionProvider<T>>` for the key's `T`.
    providers: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl ContributionRegistry {
    pub fn builder() -> ContributionRegistryBuilder {
        ContributionRegistryBuilder::default()
    }

    /// Provider for `capability`; empty when nothing was bound.
    ///
    /// Repeated calls share one provider, so contributions are instantiated
    /// once per registry.
    pub fn provider<T>(
        &self,
        capability: Capability<T>,
    ) -> OpenerResult<Arc<StaticContributionProvider<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.providers.get(capability.name()) {
            None => Ok(Arc::new(StaticContributionProvider::empty())),
            Some(erased) => Arc::clone(erased)
                .downcast::<StaticContributionProvider<T>>()
                .map_err(|_| OpenerError::ContributionTypeMismatch {
                    capability: capability.name().to_string(),
                }),
        }
    }

    pub fn capabilities(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.providers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }
}

impl fmt::Debug for ContributionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContributionRegistry")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

/// Collects bindings during application wiring.
#[derive(Default)]
pub struct ContributionRegistryBuilder {
    bindings: HashMap<&'static str, PendingBinding>,
}

struct PendingBinding {
    // `Vec<ContributionFactory<T>>` for the `T` of the first binding.
    factories: Box<dyn Any + Send + Sync>,
    seal: fn(Box<dyn Any + Send + Sync>) -> Arc<dyn Any + Send + Sync>,
}

fn seal<T>(factories: Box<dyn Any + Send + Sync>) -> Arc<dyn Any + Send + Sync>
where
    T: ?Sized + Send + Sync + 'static,
{
    let factories = factories
        .downcast::<Vec<ContributionFactory<T>>>()
        .map(|factories| *factories)
        .unwrap_or_default();
    Arc::new(StaticContributionProvider::<T>::from_factories(factories))
}

impl ContributionRegistryBuilder {
    /// Bind a factory producing one contribution for `capability`.
    ///
    /// A binding whose type differs from earlier bindings under the same
    /// capability name is dropped with a warning.
    #[must_use]
    pub fn bind<T, F>(mut self, capability: Capability<T>, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        let name = capability.name();
        let factory: ContributionFactory<T> = Arc::new(factory);

        let pending = self.bindings.entry(name).or_insert_with(|| PendingBinding {
            factories: Box::new(Vec::<ContributionFactory<T>>::new()),
            seal: seal::<T>,
        });
        match pending
            .factories
            .downcast_mut::<Vec<ContributionFactory<T>>>()
        {
            Some(factories) => {
                factories.push(factory);
                debug!(capability = name, position = factories.len(), "Bound contribution");
            }
            None => warn!(
                capability = name,
                "Ignoring contribution bound with a conflicting type"
            ),
        }
        self
    }

    /// Bind an existing instance.
    #[must_use]
    pub fn bind_instance<T>(self, capability: Capability<T>, instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind(capability, move || Arc::clone(&instance))
    }

    pub fn build(self) -> ContributionRegistry {
        let providers: HashMap<_, _> = self
            .bindings
            .into_iter()
            .map(|(name, pending)| (name, (pending.seal)(pending.factories)))
            .collect();

        info!(capabilities = providers.len(), "Contribution registry built");
        ContributionRegistry { providers }
    }
}
