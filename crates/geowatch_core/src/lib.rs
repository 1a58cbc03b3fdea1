pub mod analysis;
pub mod demo;
pub mod domain;
pub mod ports;
pub mod random;

pub use domain::{
    Aoi, AoiPatch, AoiSnapshot, AoiStatus, AuthSession, ChangeAlert, ChangeType,
    MonitoringFrequency, NdviPoint, NdviQuality, NdviStatistics, NdviTimeSeries, NewAoi, Report,
    Severity, Subscription, SummaryStats, Theme, Trend, User,
};
pub use ports::{
    AnalysisProvider, AoiProvider, AuthProvider, KeyValueStore, PortError, PortResult,
};
pub use random::RandomSource;
