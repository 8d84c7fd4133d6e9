pub mod api_dto;
pub mod workflow_dto;
