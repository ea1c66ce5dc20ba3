pub mod json_api;

pub use json_api::{
    apply_command_json, export_json, sheet_state_json, LineupCommand, LineupResponse,
};
