//! Command handlers writing their results to an output stream.

use std::io::Write;

use log::info;
use serde::Serialize;
use sitekit_consent::{ConsentBanner, ConsentSettings, MemoryCookieJar};
use sitekit_core::{
    Clock, RawRouteData, RawSiteData, SitePatch, SqliteDocumentStore, SystemClock, User,
};
use sitekit_data::SiteRepository;
use sitekit_web::{render_cookie_banner, render_routes_page};
use tokio::runtime::Runtime;

use crate::{
    BannerArgs, CliError, ConsentCommand, CreateRouteArgs, CreateSiteArgs, CreateUserArgs,
    RouteCommand, SaveConsentArgs, ShowUserArgs, SiteCommand, UpdateSiteArgs, UserCommand,
    config::StoreArgs,
};

type Repository = SiteRepository<SqliteDocumentStore>;

/// Open repository plus the runtime that drives it.
struct Session {
    runtime: Runtime,
    repository: Repository,
}

impl Session {
    fn open(store: StoreArgs) -> Result<Self, CliError> {
        let config = store.into_config()?;
        info!("using database {}", config.database);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;
        let repository = config.open()?;
        Ok(Self {
            runtime,
            repository,
        })
    }
}

pub(crate) fn run_user(
    action: UserCommand,
    store: StoreArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let session = Session::open(store)?;
    let repo = &session.repository;
    match action {
        UserCommand::Create(args) => {
            let user = user_from_args(args);
            session.runtime.block_on(repo.create_user(&user.id, &user))?;
            write_json(writer, &user)
        }
        UserCommand::Show(ShowUserArgs { id, username }) => {
            let (found, lookup) = match (id, username) {
                (Some(user_id), _) => (
                    session.runtime.block_on(repo.get_user_by_user_id(&user_id))?,
                    format!("id {user_id}"),
                ),
                (None, Some(name)) => (
                    session.runtime.block_on(repo.get_user_by_username(&name))?,
                    format!("username {name}"),
                ),
                (None, None) => (None, "no lookup key".to_owned()),
            };
            let user = found.ok_or(CliError::UserNotFound { lookup })?;
            write_json(writer, &user)
        }
    }
}

pub(crate) fn run_site(
    action: SiteCommand,
    store: StoreArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let session = Session::open(store)?;
    let repo = &session.repository;
    match action {
        SiteCommand::Create(args) => {
            let user_id = args.user_id.clone();
            let site = session
                .runtime
                .block_on(repo.create_new_site(raw_site_from_args(args), &user_id))?;
            write_json(writer, &site)
        }
        SiteCommand::List(args) => {
            let sites = match args.user_id {
                Some(user_id) => session
                    .runtime
                    .block_on(repo.get_all_sites_by_user_id(&user_id))?,
                None => session.runtime.block_on(repo.get_all_sites())?,
            };
            write_json(writer, &sites)
        }
        SiteCommand::Show(args) => {
            let site = session
                .runtime
                .block_on(repo.get_site_by_site_id(&args.site_id))?
                .ok_or(CliError::SiteNotFound {
                    site_id: args.site_id,
                })?;
            write_json(writer, &site)
        }
        SiteCommand::Update(args) => {
            let site_id = args.site_id.clone();
            let patch = patch_from_args(args);
            let site = session.runtime.block_on(async {
                repo.update_site_data(&patch, &site_id).await?;
                repo.get_site_by_site_id(&site_id).await
            })?;
            let updated = site.ok_or(CliError::SiteNotFound { site_id })?;
            write_json(writer, &updated)
        }
    }
}

pub(crate) fn run_route(
    action: RouteCommand,
    store: StoreArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let session = Session::open(store)?;
    let repo = &session.repository;
    match action {
        RouteCommand::Create(args) => {
            let site_id = args.site_id.clone();
            let route = session
                .runtime
                .block_on(repo.create_new_route(raw_route_from_args(args), &site_id))?;
            write_json(writer, &route)
        }
        RouteCommand::Page(args) => {
            let routes = session.runtime.block_on(async {
                if repo.get_site_by_site_id(&args.site_id).await?.is_none() {
                    return Ok(None);
                }
                repo.get_routes_by_site_id(&args.site_id).await.map(Some)
            })?;
            let listed = routes.ok_or(CliError::SiteNotFound {
                site_id: args.site_id,
            })?;
            write_line(writer, &render_routes_page(&listed))
        }
    }
}

pub(crate) fn run_consent(action: ConsentCommand, writer: &mut dyn Write) -> Result<(), CliError> {
    let clock = SystemClock;
    match action {
        ConsentCommand::Banner(BannerArgs { cookie }) => {
            let jar = cookie
                .as_deref()
                .map(MemoryCookieJar::from_header)
                .unwrap_or_default();
            let banner = ConsentBanner::initialise(&jar, &clock);
            write_line(writer, &render_cookie_banner(&banner))
        }
        ConsentCommand::Save(args) => {
            let mut jar = MemoryCookieJar::new();
            let mut banner = ConsentBanner::initialise(&jar, &clock);
            save_choice(&mut banner, &mut jar, &args, &clock)?;
            for header in jar.set_cookie_headers(clock.now_millis()) {
                write_line(writer, &format!("Set-Cookie: {header}"))?;
            }
            Ok(())
        }
    }
}

fn save_choice(
    banner: &mut ConsentBanner,
    jar: &mut MemoryCookieJar,
    args: &SaveConsentArgs,
    clock: &dyn Clock,
) -> Result<(), CliError> {
    if args.all {
        banner.accept_all(jar, clock)?;
        return Ok(());
    }
    let defaults = ConsentSettings::default();
    banner.set_analytics(args.analytics.unwrap_or(defaults.analytics));
    banner.set_marketing(args.marketing.unwrap_or(defaults.marketing));
    banner.save(jar, clock)?;
    Ok(())
}

fn user_from_args(args: CreateUserArgs) -> User {
    User {
        email: args.email,
        display_name: args.display_name,
        ..User::new(args.id, args.username)
    }
}

fn raw_site_from_args(args: CreateSiteArgs) -> RawSiteData {
    RawSiteData {
        description: args.description,
        custom_domain: args.custom_domain,
        ..RawSiteData::new(args.name, args.subdomain)
    }
}

fn patch_from_args(args: UpdateSiteArgs) -> SitePatch {
    SitePatch {
        name: args.name,
        subdomain: args.subdomain,
        description: args.description,
        custom_domain: args.custom_domain,
    }
}

fn raw_route_from_args(args: CreateRouteArgs) -> RawRouteData {
    RawRouteData {
        description: args.description,
        ..RawRouteData::new(args.path, args.title)
    }
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    write_line(writer, &payload)
}

fn write_line(writer: &mut dyn Write, text: &str) -> Result<(), CliError> {
    writer
        .write_all(text.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
