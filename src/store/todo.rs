//! Todo Store

use std::sync::Arc;

use leptos::prelude::*;
use reactive_stores::Store;

use super::{begin, fail, insert, remove_by_id, replace_by_id, Placement, SyncStatus, SyncTracked};
use crate::api::{self, RequestFailure, RequestGateway};
use crate::models::{Id, Todo, TodoDraft, TodoPatch};

const TODOS: &str = "/api/todos";

fn todo_path(id: Id) -> String {
    format!("{}/{}", TODOS, id)
}

#[derive(Clone, Debug, Default, Store)]
pub struct TodoState {
    /// Todos in server order, new ones appended
    pub items: Vec<Todo>,
    pub status: SyncStatus,
}

#[derive(Clone, Copy)]
pub struct TodoStore {
    state: Store<TodoState>,
    gateway: StoredValue<Arc<dyn RequestGateway>>,
}

impl SyncTracked for TodoStore {
    fn status(&self) -> SyncStatus {
        self.state.status().get()
    }

    fn write_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        f(&mut self.state.status().write());
    }
}

impl TodoStore {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            state: Store::new(TodoState::default()),
            gateway: StoredValue::new(gateway),
        }
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.state.items().get()
    }

    pub async fn fetch_todos(&self) -> Result<Vec<Todo>, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let todos: Option<Vec<Todo>> = api::get(&*gateway, TODOS)
            .await
            .map_err(|e| fail(*self, e, "Failed to fetch todos"))?;
        let todos = todos.unwrap_or_default();
        log::debug!("fetched {} todos", todos.len());
        *self.state.items().write() = todos.clone();
        Ok(todos)
    }

    pub async fn add_todo(&self, title: &str) -> Result<Todo, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let created: Todo = api::post(&*gateway, TODOS, &TodoDraft { title })
            .await
            .map_err(|e| fail(*self, e, "Failed to add todo"))?;
        insert(&mut self.state.items().write(), created.clone(), Placement::Back);
        Ok(created)
    }

    pub async fn update_todo(&self, id: Id, patch: &TodoPatch) -> Result<Todo, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let updated: Todo = api::put(&*gateway, &todo_path(id), patch)
            .await
            .map_err(|e| fail(*self, e, "Failed to update todo"))?;
        if !replace_by_id(&mut self.state.items().write(), id, updated.clone()) {
            log::debug!("todo {} not cached, update not applied locally", id);
        }
        Ok(updated)
    }

    /// Flip `completed` on the server and adopt its answer
    pub async fn toggle_todo(&self, todo: &Todo) -> Result<Todo, RequestFailure> {
        let patch = TodoPatch {
            title: todo.title.clone(),
            completed: !todo.completed,
        };
        self.update_todo(todo.id, &patch).await
    }

    pub async fn delete_todo(&self, id: Id) -> Result<(), RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        api::delete(&*gateway, &todo_path(id))
            .await
            .map_err(|e| fail(*self, e, "Failed to delete todo"))?;
        remove_by_id(&mut self.state.items().write(), id);
        Ok(())
    }
}
