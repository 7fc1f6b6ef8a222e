use std::marker::PhantomData;

use olamai_proto::{
    v1::{
        CellUpdate, CreateAgentRequest, CreateAgentResponse, CreateRemoteModelRequest,
        CreateRequest, CreateResponse, CreateSpectatorRequest, DeleteAgentRequest,
        DeleteAgentResponse, DeleteRequest, DeleteResponse, ExecuteAgentActionRequest,
        ExecuteAgentActionResponse, GetAgentObservationRequest, GetAgentObservationResponse,
        GetAgentRequest, GetAgentResponse, GetEntityRequest, GetEntityResponse, Observation,
        ReadAllRequest, ReadAllResponse, ReadRequest, ReadResponse,
        ResetWorldRequest, ResetWorldResponse, StepWorldRequest, StepWorldResponse,
        SubscribeSpectatorToRegionRequest, SubscribeSpectatorToRegionResponse,
        UnsubscribeSpectatorFromRegionRequest, UnsubscribeSpectatorFromRegionResponse,
        UpdateRequest, UpdateResponse,
    },
    ApiEndpoint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Unary,
    ServerStreaming,
}

/// Static description of one remote method: where it lives, how it is
/// called, and which message types go over the wire.
/// The prost codec for `Req`/`Resp` does the (de)serialization.
pub struct MethodDescriptor<Req, Resp> {
    pub service: &'static str,
    pub method: &'static str,
    /// `/package.Service/Method`
    pub path: &'static str,
    pub kind: MethodKind,
    pub endpoint: ApiEndpoint,
    _types: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> MethodDescriptor<Req, Resp> {
    pub const fn new(
        service: &'static str,
        method: &'static str,
        path: &'static str,
        kind: MethodKind,
        endpoint: ApiEndpoint,
    ) -> Self {
        Self {
            service,
            method,
            path,
            kind,
            endpoint,
            _types: PhantomData,
        }
    }

    pub fn path_and_query(&self) -> http::uri::PathAndQuery {
        http::uri::PathAndQuery::from_static(self.path)
    }

    pub fn grpc_method(&self) -> tonic::GrpcMethod<'static> {
        tonic::GrpcMethod::new(self.service, self.method)
    }
}

impl<Req, Resp> Clone for MethodDescriptor<Req, Resp> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Req, Resp> Copy for MethodDescriptor<Req, Resp> {}

impl<Req, Resp> std::fmt::Debug for MethodDescriptor<Req, Resp> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

macro_rules! descriptor {
    ($name:ident, $service:literal, $method:literal, $kind:ident, $endpoint:ident, $req:ty => $resp:ty) => {
        pub const $name: MethodDescriptor<$req, $resp> = MethodDescriptor::new(
            $service,
            $method,
            concat!("/", $service, "/", $method),
            MethodKind::$kind,
            ApiEndpoint::$endpoint,
        );
    };
}

pub mod to_do_service {
    use super::*;

    descriptor!(CREATE, "v1.ToDoService", "Create", Unary, CreateToDo, CreateRequest => CreateResponse);
    descriptor!(READ, "v1.ToDoService", "Read", Unary, ReadToDo, ReadRequest => ReadResponse);
    descriptor!(UPDATE, "v1.ToDoService", "Update", Unary, UpdateToDo, UpdateRequest => UpdateResponse);
    descriptor!(DELETE, "v1.ToDoService", "Delete", Unary, DeleteToDo, DeleteRequest => DeleteResponse);
    descriptor!(READ_ALL, "v1.ToDoService", "ReadAll", Unary, ReadAllToDos, ReadAllRequest => ReadAllResponse);
}

pub mod simulation_service {
    use super::*;

    descriptor!(CREATE_AGENT, "v1.SimulationService", "CreateAgent", Unary, CreateAgent, CreateAgentRequest => CreateAgentResponse);
    descriptor!(GET_AGENT, "v1.SimulationService", "GetAgent", Unary, GetAgent, GetAgentRequest => GetAgentResponse);
    descriptor!(GET_ENTITY, "v1.SimulationService", "GetEntity", Unary, GetEntity, GetEntityRequest => GetEntityResponse);
    descriptor!(DELETE_AGENT, "v1.SimulationService", "DeleteAgent", Unary, DeleteAgent, DeleteAgentRequest => DeleteAgentResponse);
    descriptor!(EXECUTE_AGENT_ACTION, "v1.SimulationService", "ExecuteAgentAction", Unary, ExecuteAgentAction, ExecuteAgentActionRequest => ExecuteAgentActionResponse);
    descriptor!(GET_AGENT_OBSERVATION, "v1.SimulationService", "GetAgentObservation", Unary, GetAgentObservation, GetAgentObservationRequest => GetAgentObservationResponse);
    descriptor!(CREATE_SPECTATOR, "v1.SimulationService", "CreateSpectator", ServerStreaming, CreateSpectator, CreateSpectatorRequest => CellUpdate);
    descriptor!(SUBSCRIBE_SPECTATOR_TO_REGION, "v1.SimulationService", "SubscribeSpectatorToRegion", Unary, SubscribeSpectatorToRegion, SubscribeSpectatorToRegionRequest => SubscribeSpectatorToRegionResponse);
    descriptor!(UNSUBSCRIBE_SPECTATOR_FROM_REGION, "v1.SimulationService", "UnsubscribeSpectatorFromRegion", Unary, UnsubscribeSpectatorFromRegion, UnsubscribeSpectatorFromRegionRequest => UnsubscribeSpectatorFromRegionResponse);
    descriptor!(CREATE_REMOTE_MODEL, "v1.SimulationService", "CreateRemoteModel", ServerStreaming, CreateRemoteModel, CreateRemoteModelRequest => Observation);
    descriptor!(RESET_WORLD, "v1.SimulationService", "ResetWorld", Unary, ResetWorld, ResetWorldRequest => ResetWorldResponse);
    descriptor!(STEP_WORLD, "v1.SimulationService", "StepWorld", Unary, StepWorld, StepWorldRequest => StepWorldResponse);
}
