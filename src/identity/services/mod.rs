//! Application services for the identity directory.

mod directory;

pub use directory::{
    CreateUserRequest, IdentityDirectoryService, IdentityError, IdentityResult, UpdateUserRequest,
};
