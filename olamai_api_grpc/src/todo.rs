use olamai_proto::v1::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};

use crate::{descriptor::to_do_service, GrpcClient};

/// Client for `v1.ToDoService`.
#[derive(Clone, Debug)]
pub struct ToDoServiceClient {
    transport: GrpcClient,
}

impl ToDoServiceClient {
    pub fn new(transport: GrpcClient) -> Self {
        Self { transport }
    }

    unary_methods! {
        /// Create a new todo task and return its id.
        create, create_with_callback => to_do_service::CREATE, CreateRequest => CreateResponse;
        /// Read one todo task by id.
        read, read_with_callback => to_do_service::READ, ReadRequest => ReadResponse;
        /// Overwrite the title and description of an existing task.
        update, update_with_callback => to_do_service::UPDATE, UpdateRequest => UpdateResponse;
        delete, delete_with_callback => to_do_service::DELETE, DeleteRequest => DeleteResponse;
        /// Every task, ordered by id.
        read_all, read_all_with_callback => to_do_service::READ_ALL, ReadAllRequest => ReadAllResponse;
    }
}
