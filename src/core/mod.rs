pub mod camera;
pub mod label;
pub mod layout;
pub mod video;

pub use camera::CameraSide;
pub use label::Label;
pub use layout::DatasetLayout;
