#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiEndpoint {
    CreateToDo,
    ReadToDo,
    UpdateToDo,
    DeleteToDo,
    ReadAllToDos,
    CreateAgent,
    GetAgent,
    GetEntity,
    DeleteAgent,
    ExecuteAgentAction,
    GetAgentObservation,
    CreateSpectator,
    SubscribeSpectatorToRegion,
    UnsubscribeSpectatorFromRegion,
    CreateRemoteModel,
    ResetWorld,
    StepWorld,
}

impl std::fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        use ApiEndpoint::*;
        match self {
            CreateToDo => write!(f, "create_to_do"),
            ReadToDo => write!(f, "read_to_do"),
            UpdateToDo => write!(f, "update_to_do"),
            DeleteToDo => write!(f, "delete_to_do"),
            ReadAllToDos => write!(f, "read_all_to_dos"),
            CreateAgent => write!(f, "create_agent"),
            GetAgent => write!(f, "get_agent"),
            GetEntity => write!(f, "get_entity"),
            DeleteAgent => write!(f, "delete_agent"),
            ExecuteAgentAction => write!(f, "execute_agent_action"),
            GetAgentObservation => write!(f, "get_agent_observation"),
            CreateSpectator => write!(f, "create_spectator"),
            SubscribeSpectatorToRegion => write!(f, "subscribe_spectator_to_region"),
            UnsubscribeSpectatorFromRegion => write!(f, "unsubscribe_spectator_from_region"),
            CreateRemoteModel => write!(f, "create_remote_model"),
            ResetWorld => write!(f, "reset_world"),
            StepWorld => write!(f, "step_world"),
        }
    }
}

/// Error converting a protobuf message into a domain type.
/// Lives here so the server and client crates can share it without
/// depending on each other.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConversionError {
    #[error("missing field {} of type {} during conversion from protobuf", .item, .r#type)]
    Missing {
        /// the item being converted
        item: &'static str,
        /// type of the item being converted
        r#type: &'static str,
    },
    #[error("type {} invalid. expected {}, got {}", .item, .expected, .got)]
    InvalidValue {
        /// the item being converted
        item: &'static str,
        /// description of the item expected, i.e 'one of UP, DOWN, LEFT, RIGHT'
        expected: &'static str,
        /// the value received
        got: String,
    },
}
