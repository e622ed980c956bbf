pub mod color;
pub mod color_classifier;
pub mod consensus;
pub mod face;
pub mod facelet_sampler;
pub mod frame;
pub mod overlay;
pub mod pixel;
pub mod region_locator;
pub mod state_assembler;
pub mod validator;
