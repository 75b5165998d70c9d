// Application layer: the concrete pipeline and the renderers it loads through.

pub mod pipelines;
pub mod render;
