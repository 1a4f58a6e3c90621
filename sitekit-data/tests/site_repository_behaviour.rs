//! Behavioural tests for [`SiteRepository`] over the SQLite document store.

use std::{cell::RefCell, sync::Arc};

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitekit_core::{
    RawSiteData, Site, SitePatch, SqliteDocumentStore, User, test_support::TickingClock,
};
use sitekit_data::{RepositoryError, SiteRepository};
use tempfile::TempDir;
use tokio::runtime::Runtime;

type Repo = SiteRepository<SqliteDocumentStore>;

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

#[fixture]
fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("build runtime")
}

#[fixture]
fn repo() -> RefCell<Option<Repo>> {
    RefCell::new(None)
}

#[fixture]
fn site() -> RefCell<Option<Site>> {
    RefCell::new(None)
}

#[fixture]
fn listed() -> RefCell<Vec<Site>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn user_lookup() -> RefCell<Option<Option<User>>> {
    RefCell::new(None)
}

#[fixture]
fn failure() -> RefCell<Option<RepositoryError>> {
    RefCell::new(None)
}

fn with_repo<T>(repo: &RefCell<Option<Repo>>, action: impl FnOnce(&Repo) -> T) -> T {
    let binding = repo.borrow();
    let active = binding
        .as_ref()
        .unwrap_or_else(|| panic!("repository must be initialised"));
    action(active)
}

fn current_site(site: &RefCell<Option<Site>>) -> Site {
    site.borrow()
        .clone()
        .unwrap_or_else(|| panic!("a site must have been created"))
}

#[given("a repository backed by SQLite")]
fn sqlite_repository(temp_dir: &TempDir, repo: &RefCell<Option<Repo>>) {
    let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("data/sitekit.db"))
        .unwrap_or_else(|_| panic!("temp dir must be UTF-8"));
    let store = SqliteDocumentStore::open(&path).expect("open store");
    let repository =
        SiteRepository::new(store).with_clock(Arc::new(TickingClock::starting_at(10)));
    *repo.borrow_mut() = Some(repository);
}

#[given("a registered user {id} called {username}")]
fn registered_user(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    id: String,
    username: String,
) {
    with_repo(repo, |active| {
        runtime
            .block_on(active.create_user(&id, &User::new(id.clone(), username)))
            .expect("create user");
    });
}

#[given("the site {name} for {owner}")]
fn existing_site(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    site: &RefCell<Option<Site>>,
    name: String,
    owner: String,
) {
    let created = with_repo(repo, |active| {
        runtime
            .block_on(active.create_new_site(RawSiteData::new(name.clone(), name), &owner))
            .expect("create site")
    });
    *site.borrow_mut() = Some(created);
}

#[when("I look up the username {username}")]
fn look_up_username(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    user_lookup: &RefCell<Option<Option<User>>>,
    username: String,
) {
    let found = with_repo(repo, |active| {
        runtime
            .block_on(active.get_user_by_username(&username))
            .expect("query username")
    });
    *user_lookup.borrow_mut() = Some(found);
}

#[when("I create the site {name} for {owner}")]
fn create_site(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    site: &RefCell<Option<Site>>,
    failure: &RefCell<Option<RepositoryError>>,
    name: String,
    owner: String,
) {
    let outcome = with_repo(repo, |active| {
        runtime.block_on(active.create_new_site(RawSiteData::new(name.clone(), name), &owner))
    });
    match outcome {
        Ok(created) => *site.borrow_mut() = Some(created),
        Err(err) => *failure.borrow_mut() = Some(err),
    }
}

#[when("I rename the site to {name}")]
fn rename_site(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    site: &RefCell<Option<Site>>,
    name: String,
) {
    let target = current_site(site);
    with_repo(repo, |active| {
        runtime
            .block_on(active.update_site_data(&SitePatch::default().name(name), &target.id))
            .expect("update site");
    });
}

#[when("I list the sites of {owner}")]
fn list_sites(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    listed: &RefCell<Vec<Site>>,
    owner: String,
) {
    let sites = with_repo(repo, |active| {
        runtime
            .block_on(active.get_all_sites_by_user_id(&owner))
            .expect("list sites")
    });
    *listed.borrow_mut() = sites;
}

#[then("no user is returned")]
fn no_user(user_lookup: &RefCell<Option<Option<User>>>) {
    match user_lookup.borrow().as_ref() {
        Some(None) => {}
        Some(Some(user)) => panic!("unexpected user {}", user.id),
        None => panic!("lookup must have run"),
    }
}

#[then("the stored site belongs to {owner}")]
fn site_belongs_to(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    site: &RefCell<Option<Site>>,
    owner: String,
) {
    let created = current_site(site);
    let stored = with_repo(repo, |active| {
        runtime
            .block_on(active.get_site_by_site_id(&created.id))
            .expect("read site")
    })
    .unwrap_or_else(|| panic!("site {} must be stored", created.id));
    assert_eq!(stored.user_id, owner);
    assert_eq!(stored, created);
}

#[then("the site identifier was not used before")]
fn identifier_unused(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    site: &RefCell<Option<Site>>,
) {
    let created = current_site(site);
    let all = with_repo(repo, |active| {
        runtime.block_on(active.get_all_sites()).expect("list sites")
    });
    let matching = all.iter().filter(|s| s.id == created.id).count();
    assert_eq!(matching, 1);
}

#[then("the stored site is named {name}")]
fn site_named(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    site: &RefCell<Option<Site>>,
    name: String,
) {
    let created = current_site(site);
    let stored = with_repo(repo, |active| {
        runtime
            .block_on(active.get_site_by_site_id(&created.id))
            .expect("read site")
    })
    .unwrap_or_else(|| panic!("site must be stored"));
    assert_eq!(stored.name, name);
}

#[then("its update time moved forward")]
fn update_time_advanced(
    runtime: &Runtime,
    repo: &RefCell<Option<Repo>>,
    site: &RefCell<Option<Site>>,
) {
    let created = current_site(site);
    let stored = with_repo(repo, |active| {
        runtime
            .block_on(active.get_site_by_site_id(&created.id))
            .expect("read site")
    })
    .unwrap_or_else(|| panic!("site must be stored"));
    assert!(stored.updated_at > created.updated_at);
}

#[then("only {name} is listed with its document key")]
fn only_listed(listed: &RefCell<Vec<Site>>, name: String) {
    let sites = listed.borrow();
    let names: Vec<_> = sites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![name.as_str()]);
    assert!(
        sites
            .iter()
            .all(|s| s.doc_id.as_deref() == Some(s.id.as_str()))
    );
}

#[then("the creation is rejected because the user is unknown")]
fn rejected_unknown_user(failure: &RefCell<Option<RepositoryError>>) {
    match failure.borrow().as_ref() {
        Some(RepositoryError::UnknownUser { user_id }) => assert_eq!(user_id, "ghost"),
        Some(other) => panic!("unexpected error: {other}"),
        None => panic!("expected the creation to fail"),
    }
}

#[scenario(path = "tests/features/site_repository.feature", index = 0)]
fn unknown_username(
    temp_dir: TempDir,
    runtime: Runtime,
    repo: RefCell<Option<Repo>>,
    user_lookup: RefCell<Option<Option<User>>>,
) {
    let _ = (temp_dir, runtime, repo, user_lookup);
}

#[scenario(path = "tests/features/site_repository.feature", index = 1)]
fn create_site_for_user(
    temp_dir: TempDir,
    runtime: Runtime,
    repo: RefCell<Option<Repo>>,
    site: RefCell<Option<Site>>,
    failure: RefCell<Option<RepositoryError>>,
) {
    let _ = (temp_dir, runtime, repo, site, failure);
}

#[scenario(path = "tests/features/site_repository.feature", index = 2)]
fn rename_refreshes_timestamp(
    temp_dir: TempDir,
    runtime: Runtime,
    repo: RefCell<Option<Repo>>,
    site: RefCell<Option<Site>>,
) {
    let _ = (temp_dir, runtime, repo, site);
}

#[scenario(path = "tests/features/site_repository.feature", index = 3)]
fn list_by_owner(
    temp_dir: TempDir,
    runtime: Runtime,
    repo: RefCell<Option<Repo>>,
    site: RefCell<Option<Site>>,
    listed: RefCell<Vec<Site>>,
) {
    let _ = (temp_dir, runtime, repo, site, listed);
}

#[scenario(path = "tests/features/site_repository.feature", index = 4)]
fn reject_unknown_owner(
    temp_dir: TempDir,
    runtime: Runtime,
    repo: RefCell<Option<Repo>>,
    site: RefCell<Option<Site>>,
    failure: RefCell<Option<RepositoryError>>,
) {
    let _ = (temp_dir, runtime, repo, site, failure);
}
