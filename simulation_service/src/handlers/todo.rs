use std::collections::BTreeMap;

use olamai_proto::{
    v1::{
        to_do_service_server, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse,
        ReadAllRequest, ReadAllResponse, ReadRequest, ReadResponse, ToDo, UpdateRequest,
        UpdateResponse,
    },
    API_VERSION,
};
use parking_lot::Mutex;
use tonic::{Request, Response, Status};

use super::{check_api, required, ServiceError};

#[derive(Default)]
struct ToDoStore {
    last_id: i64,
    items: BTreeMap<i64, ToDo>,
}

/// In-memory todo list.
#[derive(Default)]
pub struct ToDoService {
    store: Mutex<ToDoStore>,
}

impl ToDoService {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("ToDo with ID='{id}'"))
}

#[tonic::async_trait]
impl to_do_service_server::ToDoService for ToDoService {
    async fn create(
        &self,
        request: Request<CreateRequest>,
    ) -> Result<Response<CreateResponse>, Status> {
        let CreateRequest { api, to_do } = request.into_inner();
        check_api(&api)?;
        let to_do = required(to_do, "to_do", "CreateRequest")?;

        let mut store = self.store.lock();
        store.last_id += 1;
        let id = store.last_id;
        store.items.insert(
            id,
            ToDo {
                id,
                title: to_do.title,
                description: to_do.description,
            },
        );
        tracing::debug!(id, "created todo");

        Ok(Response::new(CreateResponse {
            api: API_VERSION.to_string(),
            id,
        }))
    }

    async fn read(&self, request: Request<ReadRequest>) -> Result<Response<ReadResponse>, Status> {
        let ReadRequest { api, id } = request.into_inner();
        check_api(&api)?;

        let to_do = self.store.lock().items.get(&id).cloned();
        let to_do = to_do.ok_or_else(|| not_found(id))?;
        Ok(Response::new(ReadResponse {
            api: API_VERSION.to_string(),
            to_do: Some(to_do),
        }))
    }

    async fn update(
        &self,
        request: Request<UpdateRequest>,
    ) -> Result<Response<UpdateResponse>, Status> {
        let UpdateRequest { api, to_do } = request.into_inner();
        check_api(&api)?;
        let to_do = required(to_do, "to_do", "UpdateRequest")?;

        let mut store = self.store.lock();
        let item = store
            .items
            .get_mut(&to_do.id)
            .ok_or_else(|| not_found(to_do.id))?;
        item.title = to_do.title;
        item.description = to_do.description;

        Ok(Response::new(UpdateResponse {
            api: API_VERSION.to_string(),
            updated: 1,
        }))
    }

    async fn delete(
        &self,
        request: Request<DeleteRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let DeleteRequest { api, id } = request.into_inner();
        check_api(&api)?;

        if self.store.lock().items.remove(&id).is_none() {
            return Err(not_found(id).into());
        }
        Ok(Response::new(DeleteResponse {
            api: API_VERSION.to_string(),
            deleted: 1,
        }))
    }

    async fn read_all(
        &self,
        request: Request<ReadAllRequest>,
    ) -> Result<Response<ReadAllResponse>, Status> {
        check_api(&request.get_ref().api)?;

        let to_dos = self.store.lock().items.values().cloned().collect();
        Ok(Response::new(ReadAllResponse {
            api: API_VERSION.to_string(),
            to_dos,
        }))
    }
}
