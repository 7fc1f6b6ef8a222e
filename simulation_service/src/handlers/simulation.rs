use std::{
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll},
    time::Duration,
};

use futures::Stream;
use olamai_proto::{
    v1::{
        simulation_service_server, Agent, CellUpdate, CreateAgentRequest, CreateAgentResponse,
        CreateRemoteModelRequest, CreateSpectatorRequest, DeleteAgentRequest, DeleteAgentResponse,
        ExecuteAgentActionRequest, ExecuteAgentActionResponse, GetAgentObservationRequest,
        GetAgentObservationResponse, GetAgentRequest, GetAgentResponse, GetEntityRequest,
        GetEntityResponse, Observation, ResetWorldRequest, ResetWorldResponse, StepWorldRequest,
        StepWorldResponse, SubscribeSpectatorToRegionRequest, SubscribeSpectatorToRegionResponse,
        UnsubscribeSpectatorFromRegionRequest, UnsubscribeSpectatorFromRegionResponse,
    },
    ConversionError, API_VERSION,
};
use parking_lot::Mutex;
use pin_project_lite::pin_project;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use super::{check_api, required, ServiceError};
use crate::{
    config::{Environment, ServiceConfig},
    remote_model::RemoteModels,
    stadium::Stadium,
    vec2::{Direction, Vec2},
    world::{Entity, World},
};

struct SimulationState {
    world: World,
    stadium: Stadium,
    remote_models: RemoteModels,
}

fn observe(world: &World, agent: &Entity) -> Observation {
    Observation {
        id: agent.id,
        alive: true,
        cells: world.observation_cells(agent.pos),
        energy: agent.energy,
        health: agent.health,
    }
}

impl SimulationState {
    /// Broadcast every pending cell change to its region's spectators.
    fn flush(&mut self) {
        for change in self.world.take_cell_changes() {
            self.stadium.broadcast_cell_update(&change);
        }
    }

    fn spawn_food(&mut self, count: usize) -> usize {
        self.world.spawn_food(count, &mut rand::thread_rng())
    }

    fn step(&mut self, config: &ServiceConfig) {
        for id in self.world.agent_ids() {
            // the model sees the agent before it pays for the tick
            if let Some(agent) = self.world.get_agent(id) {
                if self.remote_models.is_connected(&agent.model_name) {
                    let observation = observe(&self.world, agent);
                    self.remote_models
                        .send_observation(&agent.model_name, observation);
                }
            }
            if !self.world.living_cost(id) {
                tracing::debug!(agent = id, "agent died");
            }
        }
        if self.world.food_count() < config.min_food {
            let spawned = self.spawn_food(config.initial_food);
            tracing::trace!(spawned, "respawned food");
        }
        self.flush();
    }
}

/// Grid world simulation. Cloning shares the same world.
#[derive(Clone)]
pub struct SimulationService {
    config: Arc<ServiceConfig>,
    state: Arc<Mutex<SimulationState>>,
    closing: Arc<AtomicBool>,
}

impl SimulationService {
    pub fn new(config: ServiceConfig) -> Self {
        let mut state = SimulationState {
            world: World::new(),
            stadium: Stadium::new(config.region_size),
            remote_models: RemoteModels::new(),
        };
        if config.env != Environment::Testing {
            let spawned = state.spawn_food(config.initial_food);
            tracing::info!(spawned, "spawned initial food");
        }
        // nobody is subscribed yet
        state.world.take_cell_changes();
        Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(state)),
            closing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run one world tick.
    pub fn step_once(&self) {
        self.state.lock().step(&self.config);
    }

    /// Step the world `fps` times a second on a background task.
    /// Agents in `training` pay their living cost per action instead, so no
    /// stepper runs there.
    pub fn spawn_stepper(&self) -> Option<JoinHandle<()>> {
        if self.config.env == Environment::Training {
            return None;
        }
        let period = Duration::from_secs(1) / self.config.fps.max(1);
        let service = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                service.step_once();
            }
        }))
    }

    /// End every spectator and remote model stream and refuse new ones.
    /// Open streams would otherwise keep a graceful shutdown waiting forever.
    pub fn close_all_streams(&self) {
        let mut state = self.state.lock();
        self.closing.store(true, Ordering::SeqCst);
        state.stadium.close_all();
        state.remote_models.close_all();
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    fn not_in_prod(&self, what: &'static str) -> Result<(), ServiceError> {
        if self.config.env == Environment::Prod {
            return Err(ServiceError::NotAvailable(what));
        }
        Ok(())
    }

    fn has_spectator(&self, id: &str) -> bool {
        self.state.lock().stadium.has_spectator(id)
    }

    fn feed<T>(
        &self,
        receiver: mpsc::Receiver<Result<T, Status>>,
        owner: FeedOwner,
        token: u64,
    ) -> Feed<T> {
        Feed {
            inner: ReceiverStream::new(receiver),
            guard: FeedGuard {
                owner,
                token,
                state: self.state.clone(),
            },
        }
    }
}

enum FeedOwner {
    Spectator(String),
    RemoteModel(String),
}

/// Unregisters the owner of a feed once the feed is dropped, i.e. when the
/// client goes away.
struct FeedGuard {
    owner: FeedOwner,
    token: u64,
    state: Arc<Mutex<SimulationState>>,
}

impl Drop for FeedGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        match &self.owner {
            FeedOwner::Spectator(id) => state.stadium.release(id, self.token),
            FeedOwner::RemoteModel(name) => state.remote_models.release(name, self.token),
        }
    }
}

pin_project! {
    /// Server stream for one spectator or remote model.
    pub struct Feed<T> {
        #[pin] inner: ReceiverStream<Result<T, Status>>,
        guard: FeedGuard,
    }
}

pub type SpectatorFeed = Feed<CellUpdate>;
pub type ModelFeed = Feed<Observation>;

impl<T> Stream for Feed<T> {
    type Item = Result<T, Status>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}

fn response_api() -> String {
    API_VERSION.to_string()
}

fn region_in_bounds(region: Vec2, region_size: i32) -> Result<Vec2, ServiceError> {
    if region.is_region_in_bounds(region_size) {
        return Ok(region);
    }
    Err(ConversionError::InvalidValue {
        item: "region",
        expected: "a region containing at least one cell",
        got: region.to_string(),
    }
    .into())
}

#[tonic::async_trait]
impl simulation_service_server::SimulationService for SimulationService {
    async fn create_agent(
        &self,
        request: Request<CreateAgentRequest>,
    ) -> Result<Response<CreateAgentResponse>, Status> {
        let CreateAgentRequest {
            api,
            model_name,
            x,
            y,
        } = request.into_inner();
        check_api(&api)?;

        let mut state = self.state.lock();
        let id = state
            .world
            .new_agent(model_name, Vec2::new(x, y))
            .map_err(ServiceError::from)?;
        state.flush();
        tracing::info!(agent = id, x, y, "created agent");

        Ok(Response::new(CreateAgentResponse {
            api: response_api(),
            id,
        }))
    }

    async fn get_agent(
        &self,
        request: Request<GetAgentRequest>,
    ) -> Result<Response<GetAgentResponse>, Status> {
        let GetAgentRequest { api, id } = request.into_inner();
        check_api(&api)?;

        let agent = self.state.lock().world.get_agent(id).map(Agent::from);
        let agent = agent.ok_or_else(|| ServiceError::NotFound(format!("agent {id}")))?;
        Ok(Response::new(GetAgentResponse {
            api: response_api(),
            agent: Some(agent),
        }))
    }

    async fn get_entity(
        &self,
        request: Request<GetEntityRequest>,
    ) -> Result<Response<GetEntityResponse>, Status> {
        let GetEntityRequest { api, id } = request.into_inner();
        check_api(&api)?;

        let entity = self.state.lock().world.get(id).map(Into::into);
        let entity = entity.ok_or_else(|| ServiceError::NotFound(format!("entity {id}")))?;
        Ok(Response::new(GetEntityResponse {
            api: response_api(),
            entity: Some(entity),
        }))
    }

    async fn delete_agent(
        &self,
        request: Request<DeleteAgentRequest>,
    ) -> Result<Response<DeleteAgentResponse>, Status> {
        let DeleteAgentRequest { api, id } = request.into_inner();
        check_api(&api)?;
        self.not_in_prod("DeleteAgent")?;

        let mut state = self.state.lock();
        if state.world.get_agent(id).is_none() {
            return Err(ServiceError::NotFound(format!("agent {id}")).into());
        }
        state.world.delete_entity(id);
        state.flush();

        Ok(Response::new(DeleteAgentResponse {
            api: response_api(),
            deleted: 1,
        }))
    }

    async fn execute_agent_action(
        &self,
        request: Request<ExecuteAgentActionRequest>,
    ) -> Result<Response<ExecuteAgentActionResponse>, Status> {
        let ExecuteAgentActionRequest { api, id, action } = request.into_inner();
        check_api(&api)?;
        let action = required(action, "action", "ExecuteAgentActionRequest")?;

        let mut state = self.state.lock();
        let Some(pos) = state.world.get_agent(id).map(|a| a.pos) else {
            return Ok(Response::new(ExecuteAgentActionResponse {
                api: response_api(),
                was_action_successful: false,
                is_agent_still_alive: false,
            }));
        };
        let direction: Direction = action.direction.parse().map_err(ServiceError::from)?;

        // a step off the edge of the grid fails like a blocked one
        let successful = match (action.id.as_str(), pos.step(direction)) {
            ("MOVE", Some(target)) => state.world.entity_move(id, target),
            ("CONSUME", Some(target)) => state.world.entity_consume(id, target),
            ("MOVE" | "CONSUME", None) => false,
            (other, _) => {
                tracing::debug!(agent = id, action = other, "unknown action");
                false
            }
        };
        if self.config.env == Environment::Training {
            state.world.living_cost(id);
        }
        let alive = state.world.contains(id);
        state.flush();

        Ok(Response::new(ExecuteAgentActionResponse {
            api: response_api(),
            was_action_successful: alive && successful,
            is_agent_still_alive: alive,
        }))
    }

    async fn get_agent_observation(
        &self,
        request: Request<GetAgentObservationRequest>,
    ) -> Result<Response<GetAgentObservationResponse>, Status> {
        let GetAgentObservationRequest { api, id } = request.into_inner();
        check_api(&api)?;
        self.not_in_prod("GetAgentObservation")?;

        let state = self.state.lock();
        let observation = match state.world.get_agent(id) {
            Some(agent) => observe(&state.world, agent),
            None => Observation {
                id: 0,
                alive: false,
                cells: vec![],
                energy: 0,
                health: 0,
            },
        };

        Ok(Response::new(GetAgentObservationResponse {
            api: response_api(),
            observation: Some(observation),
        }))
    }

    type CreateSpectatorStream = SpectatorFeed;

    async fn create_spectator(
        &self,
        request: Request<CreateSpectatorRequest>,
    ) -> Result<Response<Self::CreateSpectatorStream>, Status> {
        let CreateSpectatorRequest { api, id } = request.into_inner();
        check_api(&api)?;

        let (receiver, token) = {
            let mut state = self.state.lock();
            if self.is_closing() {
                return Err(ServiceError::ShuttingDown.into());
            }
            state.stadium.add_spectator(&id)
        };
        tracing::info!(spectator = %id, "spectator connected");

        Ok(Response::new(self.feed(
            receiver,
            FeedOwner::Spectator(id),
            token,
        )))
    }

    async fn subscribe_spectator_to_region(
        &self,
        request: Request<SubscribeSpectatorToRegionRequest>,
    ) -> Result<Response<SubscribeSpectatorToRegionResponse>, Status> {
        let SubscribeSpectatorToRegionRequest { api, id, region } = request.into_inner();
        check_api(&api)?;
        let region = required(region, "region", "SubscribeSpectatorToRegionRequest")?;
        let region = region_in_bounds(Vec2::from(region), self.config.region_size)?;

        // the CreateSpectator stream may still be on its way
        let mut retries = 0;
        while !self.has_spectator(&id) {
            if retries == self.config.spectator_retries {
                return Err(ServiceError::NotFound(format!("spectator {id}")).into());
            }
            retries += 1;
            tokio::time::sleep(self.config.spectator_wait).await;
        }

        let mut state = self.state.lock();
        let snapshot = state
            .world
            .occupied_cells_in_region(region, state.stadium.region_size());
        let snapshot_len = snapshot.len();
        let successful = state
            .stadium
            .subscribe(&id, region, snapshot)
            .map_err(ServiceError::from)?;
        if successful {
            tracing::debug!(spectator = %id, %region, cells = snapshot_len, "subscribed to region");
        }

        Ok(Response::new(SubscribeSpectatorToRegionResponse {
            api: response_api(),
            successful,
        }))
    }

    async fn unsubscribe_spectator_from_region(
        &self,
        request: Request<UnsubscribeSpectatorFromRegionRequest>,
    ) -> Result<Response<UnsubscribeSpectatorFromRegionResponse>, Status> {
        let UnsubscribeSpectatorFromRegionRequest { api, id, region } = request.into_inner();
        check_api(&api)?;
        let region = required(region, "region", "UnsubscribeSpectatorFromRegionRequest")?;

        let successful = self
            .state
            .lock()
            .stadium
            .unsubscribe(&id, Vec2::from(region));
        Ok(Response::new(UnsubscribeSpectatorFromRegionResponse {
            api: response_api(),
            successful,
        }))
    }

    type CreateRemoteModelStream = ModelFeed;

    async fn create_remote_model(
        &self,
        request: Request<CreateRemoteModelRequest>,
    ) -> Result<Response<Self::CreateRemoteModelStream>, Status> {
        let CreateRemoteModelRequest { api, name } = request.into_inner();
        check_api(&api)?;

        let (receiver, token) = {
            let mut state = self.state.lock();
            if self.is_closing() {
                return Err(ServiceError::ShuttingDown.into());
            }
            state.remote_models.connect(&name).map_err(ServiceError::from)?
        };
        tracing::info!(model = %name, "remote model connected");

        Ok(Response::new(self.feed(
            receiver,
            FeedOwner::RemoteModel(name),
            token,
        )))
    }

    async fn reset_world(
        &self,
        request: Request<ResetWorldRequest>,
    ) -> Result<Response<ResetWorldResponse>, Status> {
        check_api(&request.get_ref().api)?;
        self.not_in_prod("ResetWorld")?;

        let mut state = self.state.lock();
        state.world.reset();
        state.flush();
        if self.config.env != Environment::Testing {
            state.spawn_food(self.config.initial_food);
            state.flush();
        }
        tracing::info!("world reset");

        Ok(Response::new(ResetWorldResponse {
            api: response_api(),
        }))
    }

    async fn step_world(
        &self,
        request: Request<StepWorldRequest>,
    ) -> Result<Response<StepWorldResponse>, Status> {
        check_api(&request.get_ref().api)?;
        self.not_in_prod("StepWorld")?;

        self.step_once();
        Ok(Response::new(StepWorldResponse {
            api: response_api(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use olamai_common::with_timeout;
    use olamai_proto::v1::{simulation_service_server::SimulationService as _, Action, Region};
    use rstest::rstest;

    fn config(env: Environment) -> ServiceConfig {
        ServiceConfig {
            env,
            spectator_wait: Duration::from_millis(10),
            ..Default::default()
        }
    }

    fn testing() -> SimulationService {
        SimulationService::new(config(Environment::Testing))
    }

    async fn create_agent(service: &SimulationService, x: i32, y: i32) -> i64 {
        service
            .create_agent(Request::new(CreateAgentRequest {
                api: "v1".into(),
                model_name: "walker".into(),
                x,
                y,
            }))
            .await
            .unwrap()
            .into_inner()
            .id
    }

    async fn act(
        service: &SimulationService,
        id: i64,
        action: &str,
        direction: &str,
    ) -> Result<ExecuteAgentActionResponse, Status> {
        service
            .execute_agent_action(Request::new(ExecuteAgentActionRequest {
                api: "v1".into(),
                id,
                action: Some(Action {
                    id: action.into(),
                    direction: direction.into(),
                }),
            }))
            .await
            .map(Response::into_inner)
    }

    async fn subscribe(service: &SimulationService, id: &str, x: i32, y: i32) -> Result<bool, Status> {
        service
            .subscribe_spectator_to_region(Request::new(SubscribeSpectatorToRegionRequest {
                api: "v1".into(),
                id: id.into(),
                region: Some(Region { x, y }),
            }))
            .await
            .map(|r| r.into_inner().successful)
    }

    async fn spectate(service: &SimulationService, id: &str) -> SpectatorFeed {
        service
            .create_spectator(Request::new(CreateSpectatorRequest {
                api: "v1".into(),
                id: id.into(),
            }))
            .await
            .unwrap()
            .into_inner()
    }

    #[tokio::test]
    async fn testing_env_starts_empty() {
        let service = testing();
        assert!(service.state.lock().world.is_empty());

        let dev = SimulationService::new(config(Environment::Dev));
        assert!(dev.state.lock().world.food_count() > 0);
    }

    #[tokio::test]
    async fn create_and_get_agent() {
        let service = testing();
        let id = create_agent(&service, 2, 3).await;
        let agent = service
            .get_agent(Request::new(GetAgentRequest {
                api: "".into(),
                id,
            }))
            .await
            .unwrap()
            .into_inner()
            .agent
            .unwrap();
        assert_eq!((agent.x, agent.y), (2, 3));
        assert_eq!(agent.energy, 100);
        assert_eq!(agent.health, 100);
        assert_eq!(agent.model_name, "walker");
    }

    #[tokio::test]
    async fn create_agent_on_occupied_cell() {
        let service = testing();
        create_agent(&service, 0, 0).await;
        let status = service
            .create_agent(Request::new(CreateAgentRequest {
                api: "v1".into(),
                model_name: "".into(),
                x: 0,
                y: 0,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::AlreadyExists);
    }

    #[tokio::test]
    async fn get_missing_agent() {
        let service = testing();
        let status = service
            .get_agent(Request::new(GetAgentRequest {
                api: "v1".into(),
                id: 42,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn delete_agent() {
        let service = testing();
        let id = create_agent(&service, 0, 0).await;
        let deleted = service
            .delete_agent(Request::new(DeleteAgentRequest {
                api: "v1".into(),
                id,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(deleted.deleted, 1);

        let status = service
            .delete_agent(Request::new(DeleteAgentRequest {
                api: "v1".into(),
                id,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn debug_rpcs_refused_in_prod() {
        let service = SimulationService::new(config(Environment::Prod));
        let delete = service
            .delete_agent(Request::new(DeleteAgentRequest {
                api: "v1".into(),
                id: 1,
            }))
            .await
            .unwrap_err();
        assert_eq!(delete.code(), tonic::Code::FailedPrecondition);
        let reset = service
            .reset_world(Request::new(ResetWorldRequest { api: "v1".into() }))
            .await
            .unwrap_err();
        assert_eq!(reset.code(), tonic::Code::FailedPrecondition);
        let step = service
            .step_world(Request::new(StepWorldRequest { api: "v1".into() }))
            .await
            .unwrap_err();
        assert_eq!(step.code(), tonic::Code::FailedPrecondition);
        let observation = service
            .get_agent_observation(Request::new(GetAgentObservationRequest {
                api: "v1".into(),
                id: 1,
            }))
            .await
            .unwrap_err();
        assert_eq!(observation.code(), tonic::Code::FailedPrecondition);
    }

    #[tokio::test]
    async fn execute_action_validation() {
        let service = testing();
        let id = create_agent(&service, 0, 0).await;

        let missing_action = service
            .execute_agent_action(Request::new(ExecuteAgentActionRequest {
                api: "v1".into(),
                id,
                action: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(missing_action.code(), tonic::Code::InvalidArgument);

        let bad_direction = act(&service, id, "MOVE", "NORTH").await.unwrap_err();
        assert_eq!(bad_direction.code(), tonic::Code::InvalidArgument);

        let unknown = act(&service, id, "DANCE", "UP").await.unwrap();
        assert!(!unknown.was_action_successful);
        assert!(unknown.is_agent_still_alive);

        let ghost = act(&service, id + 100, "MOVE", "UP").await.unwrap();
        assert!(!ghost.was_action_successful);
        assert!(!ghost.is_agent_still_alive);
    }

    #[tokio::test]
    async fn move_and_consume() {
        let service = testing();
        let id = create_agent(&service, 0, 0).await;
        service
            .state
            .lock()
            .world
            .new_food(Vec2::new(0, 2))
            .unwrap();

        let moved = act(&service, id, "MOVE", "UP").await.unwrap();
        assert!(moved.was_action_successful);
        let blocked = act(&service, id, "MOVE", "UP").await.unwrap();
        assert!(!blocked.was_action_successful);
        let eaten = act(&service, id, "CONSUME", "UP").await.unwrap();
        assert!(eaten.was_action_successful);

        let state = service.state.lock();
        let agent = state.world.get_agent(id).unwrap();
        assert_eq!(agent.pos, Vec2::new(0, 1));
        assert_eq!(agent.energy, 100 - 4 + 10);
        assert_eq!(state.world.food_count(), 0);
    }

    #[tokio::test]
    async fn training_charges_living_cost_per_action() {
        let service = SimulationService::new(ServiceConfig {
            initial_food: 0,
            ..config(Environment::Training)
        });
        let id = create_agent(&service, 0, 0).await;
        act(&service, id, "MOVE", "RIGHT").await.unwrap();
        let energy = service.state.lock().world.get(id).unwrap().energy;
        assert_eq!(energy, 100 - 4 - 2);
    }

    #[tokio::test]
    async fn observation() {
        let service = testing();
        let id = create_agent(&service, 0, 0).await;
        create_agent(&service, 1, 1).await;
        let observation = service
            .get_agent_observation(Request::new(GetAgentObservationRequest {
                api: "v1".into(),
                id,
            }))
            .await
            .unwrap()
            .into_inner()
            .observation
            .unwrap();
        assert!(observation.alive);
        assert_eq!(observation.id, id);
        assert_eq!(observation.cells.len(), 8);
        assert_eq!(observation.cells[2], "AGENT");

        let missing = service
            .get_agent_observation(Request::new(GetAgentObservationRequest {
                api: "v1".into(),
                id: 77,
            }))
            .await
            .unwrap()
            .into_inner()
            .observation
            .unwrap();
        assert!(!missing.alive);
        assert_eq!(missing.id, 0);
        assert!(missing.cells.is_empty());
    }

    #[tokio::test]
    async fn subscribe_sends_snapshot_then_updates() {
        let service = testing();
        let id = create_agent(&service, 1, 1).await;
        let mut feed = spectate(&service, "watcher").await;

        assert!(subscribe(&service, "watcher", 0, 0).await.unwrap());
        assert!(!subscribe(&service, "watcher", 0, 0).await.unwrap());

        let snapshot = with_timeout(5, feed.next()).await.unwrap().unwrap();
        assert_eq!((snapshot.x, snapshot.y), (1, 1));
        assert_eq!(snapshot.entity.unwrap().id, id);

        act(&service, id, "MOVE", "UP").await.unwrap();
        let vacated = with_timeout(5, feed.next()).await.unwrap().unwrap();
        assert_eq!((vacated.x, vacated.y, vacated.entity), (1, 1, None));
        let arrived = with_timeout(5, feed.next()).await.unwrap().unwrap();
        assert_eq!((arrived.x, arrived.y), (1, 2));
        assert_eq!(arrived.entity.unwrap().class, "AGENT");
    }

    #[tokio::test]
    async fn subscribe_unknown_spectator() {
        let service = testing();
        let status = subscribe(&service, "nobody", 0, 0).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let missing_region = service
            .subscribe_spectator_to_region(Request::new(SubscribeSpectatorToRegionRequest {
                api: "v1".into(),
                id: "nobody".into(),
                region: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(missing_region.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn unsubscribe() {
        let service = testing();
        let _feed = spectate(&service, "watcher").await;
        subscribe(&service, "watcher", 0, 0).await.unwrap();
        let request = || {
            Request::new(UnsubscribeSpectatorFromRegionRequest {
                api: "v1".into(),
                id: "watcher".into(),
                region: Some(Region { x: 0, y: 0 }),
            })
        };
        let first = service.unsubscribe_spectator_from_region(request()).await.unwrap();
        assert!(first.into_inner().successful);
        let second = service.unsubscribe_spectator_from_region(request()).await.unwrap();
        assert!(!second.into_inner().successful);
    }

    #[tokio::test]
    async fn dropping_the_feed_removes_the_spectator() {
        let service = testing();
        let feed = spectate(&service, "watcher").await;
        subscribe(&service, "watcher", 0, 0).await.unwrap();
        assert!(service.has_spectator("watcher"));
        drop(feed);
        let state = service.state.lock();
        assert!(!state.stadium.has_spectator("watcher"));
        assert!(!state.stadium.is_subscribed("watcher", Vec2::new(0, 0)));
    }

    #[tokio::test]
    async fn close_all_ends_feeds() {
        let service = testing();
        let mut feed = spectate(&service, "watcher").await;
        assert!(!service.is_closing());
        service.close_all_streams();
        assert!(service.is_closing());
        assert!(with_timeout(5, feed.next()).await.is_none());

        let late = service
            .create_spectator(Request::new(CreateSpectatorRequest {
                api: "v1".into(),
                id: "late".into(),
            }))
            .await
            .err()
            .unwrap();
        assert_eq!(late.code(), tonic::Code::Unavailable);
        let model = connect_model(&service, "walker").await.err().unwrap();
        assert_eq!(model.code(), tonic::Code::Unavailable);
    }

    #[tokio::test]
    async fn reset_broadcasts_empty_cells() {
        let service = testing();
        create_agent(&service, 3, 3).await;
        let mut feed = spectate(&service, "watcher").await;
        subscribe(&service, "watcher", 0, 0).await.unwrap();
        with_timeout(5, feed.next()).await.unwrap().unwrap();

        service
            .reset_world(Request::new(ResetWorldRequest { api: "v1".into() }))
            .await
            .unwrap();
        let cleared = with_timeout(5, feed.next()).await.unwrap().unwrap();
        assert_eq!((cleared.x, cleared.y, cleared.entity), (3, 3, None));
        assert!(service.state.lock().world.is_empty());
    }

    #[tokio::test]
    async fn step_charges_agents_and_respawns_food() {
        let service = SimulationService::new(ServiceConfig {
            initial_food: 10,
            min_food: 5,
            ..config(Environment::Testing)
        });
        let id = create_agent(&service, 0, 0).await;
        service
            .step_world(Request::new(StepWorldRequest { api: "v1".into() }))
            .await
            .unwrap();
        let state = service.state.lock();
        assert_eq!(state.world.get(id).unwrap().energy, 98);
        assert!(state.world.food_count() > 0);
    }

    #[tokio::test]
    async fn no_stepper_in_training() {
        let service = SimulationService::new(ServiceConfig {
            initial_food: 0,
            ..config(Environment::Training)
        });
        assert!(service.spawn_stepper().is_none());

        let stepped = testing();
        let handle = stepped.spawn_stepper().unwrap();
        handle.abort();
    }

    #[rstest]
    #[case(i32::MAX, 0)]
    #[case(0, i32::MIN)]
    #[case(-i32::MAX, 0)]
    #[tokio::test]
    async fn subscribe_outside_the_grid(#[case] x: i32, #[case] y: i32) {
        let service = testing();
        let _feed = spectate(&service, "watcher").await;
        let status = subscribe(&service, "watcher", x, y).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(!service
            .state
            .lock()
            .stadium
            .is_subscribed("watcher", Vec2::new(x, y)));
    }

    #[tokio::test]
    async fn subscribe_to_the_last_region() {
        let service = testing();
        let id = create_agent(&service, i32::MAX, i32::MIN).await;
        let mut feed = spectate(&service, "watcher").await;
        let region = Vec2::new(i32::MAX, i32::MIN).region(16);
        assert!(subscribe(&service, "watcher", region.x, region.y).await.unwrap());
        let snapshot = with_timeout(5, feed.next()).await.unwrap().unwrap();
        assert_eq!(snapshot.entity.unwrap().id, id);
    }

    #[tokio::test]
    async fn full_region_snapshot() {
        let service = testing();
        {
            let mut state = service.state.lock();
            for x in 0..16 {
                for y in 0..16 {
                    state.world.new_food(Vec2::new(x, y)).unwrap();
                }
            }
            state.world.take_cell_changes();
        }
        let mut feed = spectate(&service, "watcher").await;
        assert!(subscribe(&service, "watcher", 0, 0).await.unwrap());
        for _ in 0..256 {
            let cell = with_timeout(5, feed.next()).await.unwrap().unwrap();
            assert_eq!(cell.entity.unwrap().class, "FOOD");
        }
    }

    #[rstest]
    #[case(i32::MAX, 0, "RIGHT")]
    #[case(i32::MIN, 0, "LEFT")]
    #[case(0, i32::MAX, "UP")]
    #[case(0, i32::MIN, "DOWN")]
    #[tokio::test]
    async fn no_action_past_the_edge(#[case] x: i32, #[case] y: i32, #[case] direction: &str) {
        let service = testing();
        let id = create_agent(&service, x, y).await;
        let moved = act(&service, id, "MOVE", direction).await.unwrap();
        assert!(!moved.was_action_successful);
        assert!(moved.is_agent_still_alive);
        let eaten = act(&service, id, "CONSUME", direction).await.unwrap();
        assert!(!eaten.was_action_successful);
        assert_eq!(service.state.lock().world.get(id).unwrap().pos, Vec2::new(x, y));
    }

    #[tokio::test]
    async fn observation_in_the_corner() {
        let service = testing();
        let id = create_agent(&service, i32::MAX, i32::MAX).await;
        create_agent(&service, i32::MAX - 1, i32::MAX).await;
        let observation = service
            .get_agent_observation(Request::new(GetAgentObservationRequest {
                api: "v1".into(),
                id,
            }))
            .await
            .unwrap()
            .into_inner()
            .observation
            .unwrap();
        assert_eq!(
            observation.cells,
            ["EMPTY", "EMPTY", "EMPTY", "AGENT", "EMPTY", "EMPTY", "EMPTY", "EMPTY"]
        );
    }

    #[tokio::test]
    async fn get_entity_of_any_class() {
        let service = testing();
        let agent = create_agent(&service, 0, 0).await;
        let food = service.state.lock().world.new_food(Vec2::new(4, 5)).unwrap();
        let get = |id| {
            let service = service.clone();
            async move {
                service
                    .get_entity(Request::new(GetEntityRequest {
                        api: "v1".into(),
                        id,
                    }))
                    .await
            }
        };

        let entity = get(agent).await.unwrap().into_inner().entity.unwrap();
        assert_eq!((entity.id, entity.class.as_str()), (agent, "AGENT"));
        let entity = get(food).await.unwrap().into_inner().entity.unwrap();
        assert_eq!((entity.id, entity.class.as_str()), (food, "FOOD"));
        let missing = get(food + 100).await.unwrap_err();
        assert_eq!(missing.code(), tonic::Code::NotFound);
    }

    async fn connect_model(
        service: &SimulationService,
        name: &str,
    ) -> Result<ModelFeed, Status> {
        service
            .create_remote_model(Request::new(CreateRemoteModelRequest {
                api: "v1".into(),
                name: name.into(),
            }))
            .await
            .map(Response::into_inner)
    }

    #[tokio::test]
    async fn remote_model_observes_its_agents() {
        let service = testing();
        let mut feed = connect_model(&service, "walker").await.unwrap();
        let walker = create_agent(&service, 0, 0).await;
        service
            .create_agent(Request::new(CreateAgentRequest {
                api: "v1".into(),
                model_name: "sitter".into(),
                x: 5,
                y: 5,
            }))
            .await
            .unwrap();

        service
            .step_world(Request::new(StepWorldRequest { api: "v1".into() }))
            .await
            .unwrap();
        let observation = with_timeout(5, feed.next()).await.unwrap().unwrap();
        assert_eq!(observation.id, walker);
        assert!(observation.alive);
        assert_eq!(observation.cells.len(), 8);
        // observed before the living cost of the tick
        assert_eq!(observation.energy, 100);

        service.close_all_streams();
        assert!(with_timeout(5, feed.next()).await.is_none());
    }

    #[tokio::test]
    async fn remote_model_name_is_held_by_one_stream() {
        let service = testing();
        let feed = connect_model(&service, "walker").await.unwrap();
        let taken = connect_model(&service, "walker").await.err().unwrap();
        assert_eq!(taken.code(), tonic::Code::AlreadyExists);
        let empty = connect_model(&service, "").await.err().unwrap();
        assert_eq!(empty.code(), tonic::Code::InvalidArgument);

        drop(feed);
        assert!(!service.state.lock().remote_models.is_connected("walker"));
        assert!(connect_model(&service, "walker").await.is_ok());
    }
}
