// @generated
// This file is @generated by prost-build.
/// Task we have to do
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ToDo {
    /// Unique integer identifier of the todo task
    #[prost(int64, tag = "1")]
    pub id: i64,
    /// Title of the task
    #[prost(string, tag = "2")]
    pub title: ::prost::alloc::string::String,
    /// Detail description of the todo task
    #[prost(string, tag = "3")]
    pub description: ::prost::alloc::string::String,
}
/// Request data to create new todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateRequest {
    /// API versioning
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Task entity to add
    #[prost(message, optional, tag = "2")]
    pub to_do: ::core::option::Option<ToDo>,
}
/// Contains data of created todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// ID of created task
    #[prost(int64, tag = "2")]
    pub id: i64,
}
/// Request data to read todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Unique integer identifier of the todo task
    #[prost(int64, tag = "2")]
    pub id: i64,
}
/// Contains todo task data specified in by ID request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub to_do: ::core::option::Option<ToDo>,
}
/// Request data to update todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub to_do: ::core::option::Option<ToDo>,
}
/// Contains status of update operation
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Equals 1 in case of successful update
    #[prost(int64, tag = "2")]
    pub updated: i64,
}
/// Request data to delete todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
}
/// Contains status of delete operation
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Equals 1 in case of successful delete
    #[prost(int64, tag = "2")]
    pub deleted: i64,
}
/// Request data to read all todo task
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadAllRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
}
/// Contains list of all todo tasks
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReadAllResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub to_dos: ::prost::alloc::vec::Vec<ToDo>,
}
/// Occupant of a cell
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Entity {
    #[prost(int64, tag = "1")]
    pub id: i64,
    /// "AGENT" or "FOOD"
    #[prost(string, tag = "2")]
    pub class: ::prost::alloc::string::String,
}
/// Full state of an agent
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Agent {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(int32, tag = "2")]
    pub x: i32,
    #[prost(int32, tag = "3")]
    pub y: i32,
    #[prost(int32, tag = "4")]
    pub energy: i32,
    #[prost(int32, tag = "5")]
    pub health: i32,
    #[prost(string, tag = "6")]
    pub model_name: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Action {
    /// "MOVE" or "CONSUME"
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    /// "UP", "DOWN", "LEFT" or "RIGHT"
    #[prost(string, tag = "2")]
    pub direction: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Observation {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(bool, tag = "2")]
    pub alive: bool,
    /// The 8 surrounding cells, top row first. Each is "EMPTY" or an entity class.
    #[prost(string, repeated, tag = "3")]
    pub cells: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(int32, tag = "4")]
    pub energy: i32,
    #[prost(int32, tag = "5")]
    pub health: i32,
}
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Region {
    #[prost(int32, tag = "1")]
    pub x: i32,
    #[prost(int32, tag = "2")]
    pub y: i32,
}
/// A single cell changed. An absent entity means the cell is now empty.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CellUpdate {
    #[prost(int32, tag = "1")]
    pub x: i32,
    #[prost(int32, tag = "2")]
    pub y: i32,
    #[prost(message, optional, tag = "3")]
    pub entity: ::core::option::Option<Entity>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAgentRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub model_name: ::prost::alloc::string::String,
    #[prost(int32, tag = "3")]
    pub x: i32,
    #[prost(int32, tag = "4")]
    pub y: i32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAgentResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAgentRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAgentResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub agent: ::core::option::Option<Agent>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetEntityRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetEntityResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub entity: ::core::option::Option<Entity>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteAgentRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteAgentResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub deleted: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteAgentActionRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
    #[prost(message, optional, tag = "3")]
    pub action: ::core::option::Option<Action>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteAgentActionResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub was_action_successful: bool,
    #[prost(bool, tag = "3")]
    pub is_agent_still_alive: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAgentObservationRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub id: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAgentObservationResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub observation: ::core::option::Option<Observation>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateSpectatorRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubscribeSpectatorToRegionRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub region: ::core::option::Option<Region>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubscribeSpectatorToRegionResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub successful: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnsubscribeSpectatorFromRegionRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub region: ::core::option::Option<Region>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnsubscribeSpectatorFromRegionResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub successful: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateRemoteModelRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
    /// Agents created with this model_name are driven by the stream
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResetWorldRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResetWorldResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StepWorldRequest {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StepWorldResponse {
    #[prost(string, tag = "1")]
    pub api: ::prost::alloc::string::String,
}
include!("v1.tonic.rs");
