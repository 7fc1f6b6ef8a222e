// @generated
pub mod v1 {
    include!("v1.rs");
}
