use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{ServerType, build::Installation},
  model::{BuildView, FieldsQuery, Resolution},
  prelude::*,
  script::{self, Shell},
  state::AppState,
  sv::{build::BuildRef, search::Search, stats::SizeStats},
};

type App = State<Arc<AppState>>;

/// Wraps a payload object into `{success: true, ..payload}`.
fn success(payload: json::Value) -> Json<json::Value> {
  let mut body = json::Map::new();
  body.insert("success".into(), json::Value::Bool(true));
  if let json::Value::Object(payload) = payload {
    body.extend(payload);
  }
  Json(json::Value::Object(body))
}

pub async fn health() -> &'static str {
  "OK"
}

pub async fn build(
  State(app): App,
  Path(token): Path<String>,
  Query(query): Query<FieldsQuery>,
) -> Result<Json<json::Value>> {
  let build = BuildRef::parse(&token)?;

  let key = format!("build::{}", build.cache_key());
  let resolution: Option<Resolution> = app
    .cache
    .use_as(&key, app.config.cache_ttl, app.sv().resolve.token(&build))
    .await?;

  let resolution = resolution.ok_or(Error::BuildNotFound)?;
  Ok(success(resolution.project(&query.fields())))
}

pub async fn search(
  State(app): App,
  Query(query): Query<FieldsQuery>,
  body: Bytes,
) -> Result<Json<json::Value>> {
  let fields = query.fields();
  let ttl = app.config.cache_ttl;

  match Search::parse(&body)? {
    Search::One(filters) => {
      let key = format!("search::{filters:?}");
      let resolution: Option<Resolution> = app
        .cache
        .use_as(&key, ttl, app.sv().resolve.search(&filters))
        .await?;

      let resolution = resolution.ok_or(Error::BuildNotFound)?;
      Ok(success(resolution.project(&fields)))
    }
    Search::Many(searches) => {
      let key = format!("search::{searches:?}");
      let sv = app.sv();
      let resolutions: Vec<Option<Resolution>> = app
        .cache
        .use_as(&key, ttl, async { Ok(sv.resolve.batch(&searches).await) })
        .await?;

      let builds: Vec<_> = resolutions
        .iter()
        .map(|resolution| match resolution {
          Some(resolution) => resolution.project(&fields),
          None => json::Value::Null,
        })
        .collect();
      Ok(success(json::json!({ "builds": builds })))
    }
  }
}

pub async fn versions(
  State(app): App,
  Path(kind): Path<String>,
  Query(query): Query<FieldsQuery>,
) -> Result<Json<json::Value>> {
  let kind: ServerType = kind.parse()?;
  let fields = query.fields();

  let key = format!("builds::{kind}");
  let mut versions = app
    .cache
    .use_or(&key, app.config.cache_ttl, async {
      let summaries = app.sv().version.summaries(kind).await?;
      json::to_value(summaries).map_err(|err| Error::Internal(err.to_string()))
    })
    .await?;

  if let Some(versions) = versions.as_object_mut() {
    for summary in versions.values_mut() {
      if let Some(latest) = summary.get_mut("latest") {
        *latest = fields.retain(latest.take());
      }
    }
  }

  Ok(success(json::json!({ "builds": versions })))
}

async fn family(
  app: &AppState,
  kind: &str,
  version: &str,
) -> Result<Vec<BuildView>> {
  let kind: ServerType = kind.parse()?;

  let key = format!("builds::{kind}::{version}");
  app
    .cache
    .use_as(&key, app.config.cache_ttl, async {
      let sv = app.sv();
      let location = sv
        .version
        .location(kind, version)
        .await?
        .ok_or(Error::VersionNotFound)?;

      let builds = sv.build.list(kind, version, location).await?;
      Ok(builds.into_iter().map(BuildView::from).collect())
    })
    .await
}

pub async fn builds(
  State(app): App,
  Path((kind, version)): Path<(String, String)>,
  Query(query): Query<FieldsQuery>,
) -> Result<Json<json::Value>> {
  let fields = query.fields();
  let builds: Vec<_> = family(&app, &kind, &version)
    .await?
    .iter()
    .map(|build| fields.pick(build))
    .collect();

  Ok(success(json::json!({ "builds": builds })))
}

#[derive(Debug, Serialize)]
struct Changelog<'a> {
  id: i32,
  changes: &'a [String],
}

pub async fn changes(
  State(app): App,
  Path((kind, version)): Path<(String, String)>,
) -> Result<Json<json::Value>> {
  let builds = family(&app, &kind, &version).await?;
  let changes: Vec<_> = builds
    .iter()
    .filter(|build| !build.changes.0.is_empty())
    .map(|build| Changelog { id: build.id, changes: &build.changes.0 })
    .collect();

  Ok(success(json::json!({ "builds": changes })))
}

pub async fn types(State(app): App) -> Result<Json<json::Value>> {
  let types = app
    .cache
    .use_or("types", app.config.cache_ttl, async {
      let types = app.sv().version.types(&app.config.icon_url).await?;
      json::to_value(types).map_err(|err| Error::Internal(err.to_string()))
    })
    .await?;

  Ok(success(json::json!({ "types": types })))
}

pub async fn type_stats(
  State(app): App,
  Path(kind): Path<String>,
) -> Result<Json<json::Value>> {
  let kind: ServerType = kind.parse()?;

  let key = format!("stats::{kind}");
  let stats: SizeStats = app
    .cache
    .use_as(&key, app.config.cache_ttl, app.sv().stats.by_type(kind))
    .await?;

  Ok(success(json::json!({ "stats": stats })))
}

pub async fn type_version_stats(
  State(app): App,
  Path((kind, version)): Path<(String, String)>,
) -> Result<Json<json::Value>> {
  let kind: ServerType = kind.parse()?;
  let sv = app.sv();
  let location = sv
    .version
    .location(kind, &version)
    .await?
    .ok_or(Error::VersionNotFound)?;

  let key = format!("stats::{kind}::{version}");
  let stats: SizeStats = app
    .cache
    .use_as(
      &key,
      app.config.cache_ttl,
      sv.stats.by_type_version(kind, &version, location),
    )
    .await?;

  Ok(success(json::json!({ "stats": stats })))
}

pub async fn version_stats(
  State(app): App,
  Path(version): Path<String>,
) -> Result<Json<json::Value>> {
  let key = format!("stats::version::{version}");
  let stats: Option<SizeStats> = app
    .cache
    .use_as(&key, app.config.cache_ttl, app.sv().stats.by_version(&version))
    .await?;

  let stats = stats.ok_or(Error::VersionNotFound)?;
  Ok(success(json::json!({ "stats": stats })))
}

#[derive(Debug, Default, Deserialize)]
pub struct ScriptQuery {
  echo: Option<String>,
}

impl ScriptQuery {
  /// Progress output is on when `echo` is absent or exactly `true`.
  fn echo(&self) -> bool {
    self.echo.as_deref().is_none_or(|echo| echo == "true")
  }
}

async fn script(
  app: &AppState,
  token: &str,
  query: &ScriptQuery,
  shell: Shell,
) -> Result<Response> {
  let echo = query.echo();
  let Ok(build) = BuildRef::parse(token) else {
    return Ok(plain(script::not_found(shell, echo)));
  };

  let key = format!("script::{}", build.cache_key());
  let found: Option<(Installation, Option<i32>)> = app
    .cache
    .use_as(&key, app.config.script_cache_ttl, async {
      let found = app.sv().build.with_java(&build).await?;
      Ok(found.map(|(build, java)| (build.installation, java)))
    })
    .await?;

  let script = match found {
    Some((installation, java)) => {
      script::render(shell, &installation.0, java, echo)
    }
    None => script::not_found(shell, echo),
  };
  Ok(plain(script))
}

fn plain(body: String) -> Response {
  ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

pub async fn bash(
  State(app): App,
  Path(token): Path<String>,
  Query(query): Query<ScriptQuery>,
) -> Result<Response> {
  script(&app, &token, &query, Shell::Bash).await
}

pub async fn powershell(
  State(app): App,
  Path(token): Path<String>,
  Query(query): Query<ScriptQuery>,
) -> Result<Response> {
  script(&app, &token, &query, Shell::PowerShell).await
}
