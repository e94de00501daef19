pub use std::{collections::HashMap, sync::Arc, time::Duration};

pub use anyhow::Context;
pub use async_trait::async_trait;
pub use chrono::NaiveDateTime as DateTime;
pub use dashmap::DashMap;
pub use sea_orm::{
  ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
  QueryOrder, QuerySelect,
};
pub use tokio::time;
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Result};
