use std::collections::HashSet;
use std::convert::Infallible;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};

use reusable_state::app::AppContext;
use reusable_state::request::Outcome;
use reusable_state::store::{Entity, EntityId, ListActions, ListState, QueryParams, StoreExtension};

#[derive(Parser, Debug)]
#[command(name = "reusable-state", version, about = "Browse cats, dogs and todos over the REST API")]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cat breeds
    Cats {
        #[command(subcommand)]
        action: CatCommand,
    },
    /// Dog breeds
    Dogs {
        #[command(subcommand)]
        action: DogCommand,
    },
    /// Todo items
    Todos {
        #[command(subcommand)]
        action: TodoCommand,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

impl PageArgs {
    fn params(self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(page) = self.page {
            params = params.with_page(page);
        }
        if let Some(limit) = self.limit {
            params = params.with_limit(limit);
        }
        params
    }
}

#[derive(Subcommand, Debug)]
pub enum CatCommand {
    List(PageArgs),
    Get {
        #[arg(value_parser = parse_entity_id)]
        id: EntityId,
    },
    /// A random cat
    Random,
}

#[derive(Subcommand, Debug)]
pub enum DogCommand {
    List(PageArgs),
    Get {
        #[arg(value_parser = parse_entity_id)]
        id: EntityId,
    },
}

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    List(PageArgs),
    Get {
        #[arg(value_parser = parse_entity_id)]
        id: EntityId,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        #[arg(value_parser = parse_entity_id)]
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip the done status
    Toggle {
        #[arg(value_parser = parse_entity_id)]
        id: EntityId,
    },
    Delete {
        #[arg(value_parser = parse_entity_id)]
        id: EntityId,
    },
}

/// Numeric ids become [`EntityId::Int`] so they match what the API returns.
fn parse_entity_id(raw: &str) -> Result<EntityId, Infallible> {
    raw.parse()
}

/// Run `command` and return what should be printed.
pub async fn run(ctx: &AppContext, command: Command) -> Result<Value> {
    match command {
        Command::Cats { action } => {
            let actions = ctx.cats.actions();
            match action {
                CatCommand::List(page) => list(actions, page.params()).await,
                CatCommand::Get { id } => get(actions, id).await,
                CatCommand::Random => {
                    settle(ctx.cats.get_one_random_cat(None).await)?;
                    let cat = ctx
                        .cats
                        .random_cat()
                        .ok_or_else(|| anyhow!("no random cat returned"))?;
                    Ok(serde_json::to_value(cat)?)
                }
            }
        }
        Command::Dogs { action } => match action {
            DogCommand::List(page) => list(&ctx.dogs, page.params()).await,
            DogCommand::Get { id } => get(&ctx.dogs, id).await,
        },
        Command::Todos { action } => {
            let todos = &ctx.todos;
            match action {
                TodoCommand::List(page) => list(todos.actions(), page.params()).await,
                TodoCommand::Get { id } => get(todos.actions(), id).await,
                TodoCommand::Create { title, description } => {
                    let mut draft = Map::new();
                    draft.insert("title".into(), json!(title));
                    if let Some(description) = description {
                        draft.insert("description".into(), json!(description));
                    }
                    let known: HashSet<EntityId> =
                        todos.store().read(|state| state.map.keys().cloned().collect());
                    settle(todos.actions().create_one(Value::Object(draft), None).await)?;
                    let state = todos.store().snapshot();
                    let id = state
                        .map
                        .keys()
                        .find(|id| !known.contains(*id))
                        .cloned()
                        .ok_or_else(|| anyhow!("created todo was not stored"))?;
                    entity(state, &id)
                }
                TodoCommand::Update {
                    id,
                    title,
                    description,
                } => {
                    let mut patch = Map::new();
                    if let Some(title) = title {
                        patch.insert("title".into(), json!(title));
                    }
                    if let Some(description) = description {
                        patch.insert("description".into(), json!(description));
                    }
                    if patch.is_empty() {
                        bail!("nothing to update: pass --title and/or --description");
                    }
                    settle(
                        todos
                            .actions()
                            .update_one(id.clone(), Value::Object(patch), None)
                            .await,
                    )?;
                    entity(todos.store().snapshot(), &id)
                }
                TodoCommand::Toggle { id } => {
                    settle(todos.toggle_todo_done_status(id.clone(), None).await)?;
                    entity(todos.store().snapshot(), &id)
                }
                TodoCommand::Delete { id } => {
                    settle(todos.actions().delete_one(id.clone(), None).await)?;
                    Ok(json!({ "deleted": id }))
                }
            }
        }
    }
}

async fn list<T, X>(actions: &ListActions<T, X>, params: QueryParams) -> Result<Value>
where
    T: Entity,
    X: StoreExtension<T>,
{
    settle(actions.get_all(params.clone(), None).await)?;
    let state = actions.store().snapshot();
    let items = state.page_items(&params);
    let meta = state
        .board(&params)
        .map(|board| Value::Object(board.meta_data.clone()))
        .unwrap_or(Value::Null);
    Ok(json!({ "items": items, "meta": meta }))
}

async fn get<T, X>(actions: &ListActions<T, X>, id: EntityId) -> Result<Value>
where
    T: Entity,
    X: StoreExtension<T>,
{
    settle(actions.get_one(id.clone(), None).await)?;
    entity(actions.store().snapshot(), &id)
}

fn entity<T: Entity, X>(state: ListState<T, X>, id: &EntityId) -> Result<Value> {
    let item = state
        .entity(id)
        .ok_or_else(|| anyhow!("{} not found in store", id))?;
    Ok(serde_json::to_value(item)?)
}

fn settle(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Succeeded => Ok(()),
        Outcome::Failed(message) => bail!(message),
    }
}
