pub mod http;
pub mod local_analysis;
pub mod local_aoi;
pub mod local_auth;
pub mod records;
pub mod store;
pub mod theme;

pub use http::{HttpAnalysisAdapter, HttpAoiAdapter, HttpAuthAdapter, HttpSession};
pub use local_analysis::LocalAnalysisAdapter;
pub use local_aoi::LocalAoiAdapter;
pub use local_auth::LocalAuthAdapter;
pub use records::SimulatedLatency;
pub use store::{MemoryStore, RedbStore};
pub use theme::ThemeStore;
