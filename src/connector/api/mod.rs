pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig};
pub use controller::{AskQuestionResponse, ErrorResponse, GENERIC_ERROR_MESSAGE};
pub use router::{Router, HEALTH_PATH};
