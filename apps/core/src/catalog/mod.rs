//! Music catalog access: the search interface, the Spotify backend and the
//! reconciler that checks generated candidates against it.

pub mod reconciler;
pub mod spotify;
pub mod traits;

pub use reconciler::{CatalogReconciler, Reconciliation};
pub use spotify::{SpotifyCatalog, SpotifyCredentials};
pub use traits::CatalogSearch;
