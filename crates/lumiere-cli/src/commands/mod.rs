pub mod cards;
pub mod explain;
pub mod init;
pub mod levels;
pub mod list;
pub mod mistakes;
pub mod quiz;
pub mod say;
pub mod scenario;
pub mod unlock;
pub mod validate;
