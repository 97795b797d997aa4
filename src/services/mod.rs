pub mod ai_service; // Vision provider seam
pub mod ark; // Volcengine Ark Responses API
pub mod ark_response;

pub use ai_service::VisionService;
pub use ark::ArkService;
