use olamai_proto::v1::{
    CreateAgentRequest, CreateAgentResponse, CreateRemoteModelRequest, CreateSpectatorRequest,
    DeleteAgentRequest, DeleteAgentResponse, ExecuteAgentActionRequest,
    ExecuteAgentActionResponse, GetAgentObservationRequest, GetAgentObservationResponse,
    GetAgentRequest, GetAgentResponse, GetEntityRequest, GetEntityResponse, ResetWorldRequest, ResetWorldResponse, StepWorldRequest, StepWorldResponse,
    SubscribeSpectatorToRegionRequest, SubscribeSpectatorToRegionResponse,
    UnsubscribeSpectatorFromRegionRequest, UnsubscribeSpectatorFromRegionResponse,
};

use crate::{
    descriptor::simulation_service as methods,
    streams::{ApiStream, ObservationStream, SpectatorStream},
    ApiClientError, CallMetadata, GrpcClient,
};

/// Client for `v1.SimulationService`.
#[derive(Clone, Debug)]
pub struct SimulationServiceClient {
    transport: GrpcClient,
}

impl SimulationServiceClient {
    pub fn new(transport: GrpcClient) -> Self {
        Self { transport }
    }

    unary_methods! {
        create_agent, create_agent_with_callback
            => methods::CREATE_AGENT, CreateAgentRequest => CreateAgentResponse;
        get_agent, get_agent_with_callback
            => methods::GET_AGENT, GetAgentRequest => GetAgentResponse;
        /// Any entity, agent or food.
        get_entity, get_entity_with_callback
            => methods::GET_ENTITY, GetEntityRequest => GetEntityResponse;
        delete_agent, delete_agent_with_callback
            => methods::DELETE_AGENT, DeleteAgentRequest => DeleteAgentResponse;
        /// Move or consume in one direction.
        execute_agent_action, execute_agent_action_with_callback
            => methods::EXECUTE_AGENT_ACTION, ExecuteAgentActionRequest => ExecuteAgentActionResponse;
        /// The eight cells around the agent plus its vitals.
        get_agent_observation, get_agent_observation_with_callback
            => methods::GET_AGENT_OBSERVATION, GetAgentObservationRequest => GetAgentObservationResponse;
        /// Start receiving the cells of a region on the spectator's stream.
        subscribe_spectator_to_region, subscribe_spectator_to_region_with_callback
            => methods::SUBSCRIBE_SPECTATOR_TO_REGION, SubscribeSpectatorToRegionRequest => SubscribeSpectatorToRegionResponse;
        unsubscribe_spectator_from_region, unsubscribe_spectator_from_region_with_callback
            => methods::UNSUBSCRIBE_SPECTATOR_FROM_REGION, UnsubscribeSpectatorFromRegionRequest => UnsubscribeSpectatorFromRegionResponse;
        reset_world, reset_world_with_callback
            => methods::RESET_WORLD, ResetWorldRequest => ResetWorldResponse;
        step_world, step_world_with_callback
            => methods::STEP_WORLD, StepWorldRequest => StepWorldResponse;
    }

    /// Register a spectator and stream the cell updates of every region it
    /// subscribes to. Dropping the stream unregisters the spectator.
    pub async fn create_spectator(
        &self,
        request: CreateSpectatorRequest,
        metadata: &CallMetadata,
    ) -> Result<SpectatorStream, ApiClientError> {
        let descriptor = methods::CREATE_SPECTATOR;
        let stream = self
            .transport
            .server_streaming(&descriptor, request, metadata)
            .await?;
        Ok(ApiStream::new(stream, descriptor.endpoint))
    }

    /// Drive every agent created with `request.name` as its model name.
    /// The stream carries one observation per agent per world step until it
    /// is dropped, which frees the name again.
    pub async fn create_remote_model(
        &self,
        request: CreateRemoteModelRequest,
        metadata: &CallMetadata,
    ) -> Result<ObservationStream, ApiClientError> {
        let descriptor = methods::CREATE_REMOTE_MODEL;
        let stream = self
            .transport
            .server_streaming(&descriptor, request, metadata)
            .await?;
        Ok(ApiStream::new(stream, descriptor.endpoint))
    }
}
