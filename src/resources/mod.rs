//! The concrete resources: cats, dogs and todos.

mod cats;
mod dogs;
mod todos;

pub use cats::{
    build_cat_queries, get_random_cat, Cat, CatAction, CatStore, RandomCatState, CAT_ENDPOINT,
};
pub use dogs::{build_dog_queries, build_dog_store, Dog, Measure, DOG_ENDPOINT};
pub use todos::{
    build_todo_queries, toggle_todo, Todo, TodoService, TodoStore, TODO_ENDPOINT,
};
