pub mod feeds;
pub mod lap_mapper;
pub mod matcher;
pub mod normalizer;
pub mod sync_orchestrator;
pub mod tcx_renderer;
