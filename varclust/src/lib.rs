#[cfg(feature = "core")]
#[doc(inline)]
pub use varclust_core as core;

#[cfg(feature = "store")]
#[doc(inline)]
pub use varclust_store as store;

#[cfg(feature = "engine")]
#[doc(inline)]
pub use varclust_engine as engine;
