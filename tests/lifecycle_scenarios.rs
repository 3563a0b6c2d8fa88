//! Lifecycle behaviour under concurrent writers and partial store failures
//!
//! Store doubles wrap the in-memory store to reproduce the two awkward
//! cases: a writer acting on a stale read, and a submission store that
//! fails after the task row was already written.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use taskboard_api::domain::errors::{DomainError, DomainResult};
use taskboard_api::domain::repositories::{Repositories, SubmissionRepository, TaskRepository};
use taskboard_api::domain::task::{
    NewTask, Reward, StatusUpdate, Task, TaskAction, TaskStatus, TaskSubmission,
};
use taskboard_api::domain::user::{Email, Role, StateName, User};
use taskboard_api::domain::visibility::TaskFilter;
use taskboard_api::domain::Caller;
use taskboard_api::infrastructure::repositories::{in_memory_repositories, InMemoryStore};
use taskboard_api::services::{SubmitProof, TaskLifecycleService};
use uuid::Uuid;

struct People {
    admin: Caller,
    head: Caller,
    member: Caller,
}

async fn seed(repos: &Repositories) -> People {
    let mut callers = Vec::new();
    for (email, role, state) in [
        ("admin@board.test", Role::SuperAdmin, None),
        ("head@board.test", Role::StateHead, Some("Lagos")),
        ("member@board.test", Role::TeamMember, Some("Lagos")),
    ] {
        let user = User::register(
            Email::new(email).unwrap(),
            email.to_string(),
            role,
            state.map(|s| StateName::new(s).unwrap()),
        )
        .unwrap();
        repos.users.create(&user, "hash").await.unwrap();
        callers.push(Caller::from_user(&user).unwrap());
    }
    let member = callers.pop().unwrap();
    let head = callers.pop().unwrap();
    let admin = callers.pop().unwrap();
    People {
        admin,
        head,
        member,
    }
}

fn new_task(assignee: &Caller) -> NewTask {
    NewTask {
        title: "Repaint polling unit".to_string(),
        description: String::new(),
        assigned_to: assignee.id(),
        reward: Reward::new(Decimal::from(1500)).unwrap(),
        due_date: None,
    }
}

fn proof() -> SubmitProof {
    SubmitProof {
        proof_text: "Painted, see photo".to_string(),
        proof_files: vec!["blob://p/1.png".to_string()],
    }
}

async fn stored(store: &InMemoryStore, id: Uuid) -> Task {
    TaskRepository::find_by_id(store, id)
        .await
        .unwrap()
        .expect("task exists")
}

/// Serves a frozen copy of one task on reads; writes go to the real store
struct StaleReads {
    store: InMemoryStore,
    frozen: Mutex<Option<Task>>,
}

#[async_trait]
impl TaskRepository for StaleReads {
    async fn list(&self, filter: &TaskFilter) -> DomainResult<Vec<Task>> {
        TaskRepository::list(&self.store, filter).await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Task>> {
        let frozen = self.frozen.lock().unwrap().clone();
        match frozen {
            Some(task) if task.id() == id => Ok(Some(task)),
            _ => TaskRepository::find_by_id(&self.store, id).await,
        }
    }

    async fn create(&self, task: &Task) -> DomainResult<Uuid> {
        TaskRepository::create(&self.store, task).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: TaskStatus,
        update: &StatusUpdate,
    ) -> DomainResult<bool> {
        self.store.update_status(id, expected, update).await
    }
}

#[tokio::test]
async fn writer_on_stale_read_loses_the_guarded_write() {
    let store = InMemoryStore::new();
    let repos = in_memory_repositories(store.clone());
    let people = seed(&repos).await;
    let fresh = TaskLifecycleService::new(repos.clone());

    let task = fresh.create_task(&people.head, new_task(&people.member)).await.unwrap();
    fresh.submit(&people.member, task.id(), proof()).await.unwrap();

    // The second writer read the task while it was still submitted
    let stale_tasks = Arc::new(StaleReads {
        store: store.clone(),
        frozen: Mutex::new(Some(stored(&store, task.id()).await)),
    });
    let stale = TaskLifecycleService::new(Repositories {
        tasks: stale_tasks,
        ..repos.clone()
    });

    fresh.approve(&people.head, task.id()).await.unwrap();
    let err = stale
        .reject(&people.head, task.id(), Some("too late".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::InvalidTransition {
            action: TaskAction::Reject,
            ..
        }
    ));
    let after = stored(&store, task.id()).await;
    assert_eq!(after.status(), TaskStatus::Approved);
    assert_eq!(after.approved_by(), Some(people.head.id()));
}

#[tokio::test]
async fn concurrent_verifies_succeed_exactly_once() {
    let store = InMemoryStore::new();
    let repos = in_memory_repositories(store.clone());
    let people = seed(&repos).await;
    let service = TaskLifecycleService::new(repos);

    let task = service
        .create_task(&people.head, new_task(&people.member))
        .await
        .unwrap();
    service.submit(&people.member, task.id(), proof()).await.unwrap();

    let (a, b) = tokio::join!(
        service.verify(&people.admin, task.id()),
        service.verify(&people.admin, task.id())
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(DomainError::InvalidTransition {
            action: TaskAction::Verify,
            ..
        })
    )));
    assert_eq!(stored(&store, task.id()).await.status(), TaskStatus::Verified);
}

/// Submission store whose writes can be made to fail
struct FlakySubmissions {
    store: InMemoryStore,
    fail_create: bool,
    fail_review: bool,
}

fn outage() -> DomainError {
    DomainError::StoreUnavailable("submissions table unreachable".to_string())
}

#[async_trait]
impl SubmissionRepository for FlakySubmissions {
    async fn create(&self, submission: &TaskSubmission) -> DomainResult<Uuid> {
        if self.fail_create {
            return Err(outage());
        }
        SubmissionRepository::create(&self.store, submission).await
    }

    async fn list_for_task(&self, task_id: Uuid) -> DomainResult<Vec<TaskSubmission>> {
        self.store.list_for_task(task_id).await
    }

    async fn find_pending(&self, task_id: Uuid) -> DomainResult<Option<TaskSubmission>> {
        self.store.find_pending(task_id).await
    }

    async fn record_review(&self, submission: &TaskSubmission) -> DomainResult<()> {
        if self.fail_review {
            return Err(outage());
        }
        self.store.record_review(submission).await
    }
}

fn with_flaky_submissions(
    repos: &Repositories,
    store: &InMemoryStore,
    fail_create: bool,
    fail_review: bool,
) -> TaskLifecycleService {
    TaskLifecycleService::new(Repositories {
        submissions: Arc::new(FlakySubmissions {
            store: store.clone(),
            fail_create,
            fail_review,
        }),
        ..repos.clone()
    })
}

#[tokio::test]
async fn failed_submission_write_restores_assigned() {
    let store = InMemoryStore::new();
    let repos = in_memory_repositories(store.clone());
    let people = seed(&repos).await;
    let service = with_flaky_submissions(&repos, &store, true, false);

    let task = service
        .create_task(&people.head, new_task(&people.member))
        .await
        .unwrap();
    let err = service
        .submit(&people.member, task.id(), proof())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::StoreUnavailable(_)));
    let after = stored(&store, task.id()).await;
    assert_eq!(after.status(), TaskStatus::Assigned);
    assert_eq!(after.updated_at(), task.updated_at());
    assert!(store.list_for_task(task.id()).await.unwrap().is_empty());

    // Once the store recovers the member can submit normally
    let healthy = TaskLifecycleService::new(repos);
    let submitted = healthy.submit(&people.member, task.id(), proof()).await.unwrap();
    assert_eq!(submitted.status(), TaskStatus::Submitted);
}

#[tokio::test]
async fn failed_review_write_restores_submitted() {
    let store = InMemoryStore::new();
    let repos = in_memory_repositories(store.clone());
    let people = seed(&repos).await;
    let healthy = TaskLifecycleService::new(repos.clone());
    let flaky = with_flaky_submissions(&repos, &store, false, true);

    let task = healthy
        .create_task(&people.head, new_task(&people.member))
        .await
        .unwrap();
    healthy.submit(&people.member, task.id(), proof()).await.unwrap();

    let err = flaky.approve(&people.head, task.id()).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable(_)));

    let after = stored(&store, task.id()).await;
    assert_eq!(after.status(), TaskStatus::Submitted);
    assert_eq!(after.approved_by(), None);
    assert!(store.find_pending(task.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn every_invalid_action_leaves_the_stored_task_untouched() {
    let store = InMemoryStore::new();
    let repos = in_memory_repositories(store.clone());
    let people = seed(&repos).await;
    let service = TaskLifecycleService::new(repos);

    let task = service
        .create_task(&people.head, new_task(&people.member))
        .await
        .unwrap();
    let before = stored(&store, task.id()).await;

    // From assigned only submit is valid
    assert!(service.approve(&people.head, task.id()).await.is_err());
    assert!(service
        .reject(&people.head, task.id(), None)
        .await
        .is_err());
    assert!(service.verify(&people.admin, task.id()).await.is_err());
    // Only the assignee may submit
    assert!(service.submit(&people.head, task.id(), proof()).await.is_err());

    assert_eq!(stored(&store, task.id()).await, before);
}
