//! Resource/operation lookup and execution.

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use viralapp_fetch::Transport;
use viralapp_types::{Result, ViralAppError};

use crate::handlers::{
    account_analytics, general_analytics, integrations, projects, tracked_accounts, tracked_videos,
    video_analytics,
};
use crate::{OperationContext, OperationOutput, Parameters};

/// API resources exposed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Account-level analytics.
    AccountAnalytics,
    /// Organization-wide analytics.
    GeneralAnalytics,
    /// Connected apps.
    Integrations,
    /// Projects grouping tracked accounts.
    Projects,
    /// Accounts whose videos are tracked.
    TrackedAccounts,
    /// Individually tracked videos.
    TrackedIndividualVideos,
    /// Video-level analytics.
    VideoAnalytics,
}

/// Every operation, named `<resource><operation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Operation {
    AccountAnalyticsGetAll,
    AccountAnalyticsExport,
    GeneralAnalyticsGetKpis,
    GeneralAnalyticsGetTopVideos,
    GeneralAnalyticsGetTopAccounts,
    GeneralAnalyticsGetInteractionMetrics,
    GeneralAnalyticsExportDailyGains,
    IntegrationsGetApps,
    ProjectsGetAll,
    ProjectsCreate,
    ProjectsUpdate,
    ProjectsDelete,
    ProjectsAddAccount,
    ProjectsRemoveAccount,
    TrackedAccountsGetAll,
    TrackedAccountsAdd,
    TrackedAccountsGetCount,
    TrackedAccountsRefresh,
    TrackedAccountsUpdateMaxVideos,
    TrackedAccountsUpdateHashtags,
    TrackedAccountsUpdateProjectHashtags,
    TrackedVideosGetAll,
    TrackedVideosAdd,
    TrackedVideosRefresh,
    VideoAnalyticsGetAll,
    VideoAnalyticsGet,
    VideoAnalyticsDownload,
    VideoAnalyticsGetHistory,
    VideoAnalyticsGetActivity,
    VideoAnalyticsExport,
    VideoAnalyticsGetExcluded,
    VideoAnalyticsExclude,
    VideoAnalyticsRestoreExcluded,
}

type OperationTable = &'static [(&'static str, Operation)];

const ACCOUNT_ANALYTICS: OperationTable = &[
    ("getAll", Operation::AccountAnalyticsGetAll),
    ("export", Operation::AccountAnalyticsExport),
];

const GENERAL_ANALYTICS: OperationTable = &[
    ("getKpis", Operation::GeneralAnalyticsGetKpis),
    ("getTopVideos", Operation::GeneralAnalyticsGetTopVideos),
    ("getTopAccounts", Operation::GeneralAnalyticsGetTopAccounts),
    ("getInteractionMetrics", Operation::GeneralAnalyticsGetInteractionMetrics),
    ("exportDailyGains", Operation::GeneralAnalyticsExportDailyGains),
];

const INTEGRATIONS: OperationTable = &[("getApps", Operation::IntegrationsGetApps)];

const PROJECTS: OperationTable = &[
    ("getAll", Operation::ProjectsGetAll),
    ("create", Operation::ProjectsCreate),
    ("update", Operation::ProjectsUpdate),
    ("delete", Operation::ProjectsDelete),
    ("addAccount", Operation::ProjectsAddAccount),
    ("removeAccount", Operation::ProjectsRemoveAccount),
];

const TRACKED_ACCOUNTS: OperationTable = &[
    ("getAll", Operation::TrackedAccountsGetAll),
    ("add", Operation::TrackedAccountsAdd),
    ("getCount", Operation::TrackedAccountsGetCount),
    ("refresh", Operation::TrackedAccountsRefresh),
    ("updateMaxVideos", Operation::TrackedAccountsUpdateMaxVideos),
    ("updateHashtags", Operation::TrackedAccountsUpdateHashtags),
    ("updateProjectHashtags", Operation::TrackedAccountsUpdateProjectHashtags),
];

const TRACKED_VIDEOS: OperationTable = &[
    ("getAll", Operation::TrackedVideosGetAll),
    ("add", Operation::TrackedVideosAdd),
    ("refresh", Operation::TrackedVideosRefresh),
];

const VIDEO_ANALYTICS: OperationTable = &[
    ("getAll", Operation::VideoAnalyticsGetAll),
    ("get", Operation::VideoAnalyticsGet),
    ("download", Operation::VideoAnalyticsDownload),
    ("getHistory", Operation::VideoAnalyticsGetHistory),
    ("getActivity", Operation::VideoAnalyticsGetActivity),
    ("export", Operation::VideoAnalyticsExport),
    ("getExcluded", Operation::VideoAnalyticsGetExcluded),
    ("exclude", Operation::VideoAnalyticsExclude),
    ("restoreExcluded", Operation::VideoAnalyticsRestoreExcluded),
];

impl Resource {
    /// All resources.
    pub const ALL: [Self; 7] = [
        Self::AccountAnalytics,
        Self::GeneralAnalytics,
        Self::Integrations,
        Self::Projects,
        Self::TrackedAccounts,
        Self::TrackedIndividualVideos,
        Self::VideoAnalytics,
    ];

    /// Host-facing name, e.g. `trackedAccounts`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccountAnalytics => "accountAnalytics",
            Self::GeneralAnalytics => "generalAnalytics",
            Self::Integrations => "integrations",
            Self::Projects => "projects",
            Self::TrackedAccounts => "trackedAccounts",
            Self::TrackedIndividualVideos => "trackedIndividualVideos",
            Self::VideoAnalytics => "videoAnalytics",
        }
    }

    const fn table(&self) -> OperationTable {
        match self {
            Self::AccountAnalytics => ACCOUNT_ANALYTICS,
            Self::GeneralAnalytics => GENERAL_ANALYTICS,
            Self::Integrations => INTEGRATIONS,
            Self::Projects => PROJECTS,
            Self::TrackedAccounts => TRACKED_ACCOUNTS,
            Self::TrackedIndividualVideos => TRACKED_VIDEOS,
            Self::VideoAnalytics => VIDEO_ANALYTICS,
        }
    }

    /// Host-facing names of this resource's operations.
    pub fn operation_names(&self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|(name, _)| *name)
    }

    /// Looks up an operation by name.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` naming both the resource and the operation.
    pub fn operation(&self, name: &str) -> Result<Operation> {
        self.table()
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, operation)| *operation)
            .ok_or_else(|| ViralAppError::UnsupportedOperation {
                resource: self.as_str().to_string(),
                operation: name.to_string(),
            })
    }
}

impl FromStr for Resource {
    type Err = ViralAppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.as_str() == s)
            .ok_or_else(|| ViralAppError::UnsupportedResource {
                resource: s.to_string(),
            })
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Operation {
    /// Runs the handler behind this operation.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler fails with: validation errors from
    /// parameter checks, or transport errors from the API.
    pub async fn execute(self, ctx: &OperationContext<'_>) -> Result<OperationOutput> {
        match self {
            Self::AccountAnalyticsGetAll => account_analytics::get_all(ctx).await,
            Self::AccountAnalyticsExport => account_analytics::export(ctx).await,
            Self::GeneralAnalyticsGetKpis => general_analytics::get_kpis(ctx).await,
            Self::GeneralAnalyticsGetTopVideos => general_analytics::get_top_videos(ctx).await,
            Self::GeneralAnalyticsGetTopAccounts => general_analytics::get_top_accounts(ctx).await,
            Self::GeneralAnalyticsGetInteractionMetrics => {
                general_analytics::get_interaction_metrics(ctx).await
            }
            Self::GeneralAnalyticsExportDailyGains => {
                general_analytics::export_daily_gains(ctx).await
            }
            Self::IntegrationsGetApps => integrations::get_apps(ctx).await,
            Self::ProjectsGetAll => projects::get_all(ctx).await,
            Self::ProjectsCreate => projects::create(ctx).await,
            Self::ProjectsUpdate => projects::update(ctx).await,
            Self::ProjectsDelete => projects::delete(ctx).await,
            Self::ProjectsAddAccount => projects::add_account(ctx).await,
            Self::ProjectsRemoveAccount => projects::remove_account(ctx).await,
            Self::TrackedAccountsGetAll => tracked_accounts::get_all(ctx).await,
            Self::TrackedAccountsAdd => tracked_accounts::add(ctx).await,
            Self::TrackedAccountsGetCount => tracked_accounts::get_count(ctx).await,
            Self::TrackedAccountsRefresh => tracked_accounts::refresh(ctx).await,
            Self::TrackedAccountsUpdateMaxVideos => tracked_accounts::update_max_videos(ctx).await,
            Self::TrackedAccountsUpdateHashtags => tracked_accounts::update_hashtags(ctx).await,
            Self::TrackedAccountsUpdateProjectHashtags => {
                tracked_accounts::update_project_hashtags(ctx).await
            }
            Self::TrackedVideosGetAll => tracked_videos::get_all(ctx).await,
            Self::TrackedVideosAdd => tracked_videos::add(ctx).await,
            Self::TrackedVideosRefresh => tracked_videos::refresh(ctx).await,
            Self::VideoAnalyticsGetAll => video_analytics::get_all(ctx).await,
            Self::VideoAnalyticsGet => video_analytics::get(ctx).await,
            Self::VideoAnalyticsDownload => video_analytics::download(ctx).await,
            Self::VideoAnalyticsGetHistory => video_analytics::get_history(ctx).await,
            Self::VideoAnalyticsGetActivity => video_analytics::get_activity(ctx).await,
            Self::VideoAnalyticsExport => video_analytics::export(ctx).await,
            Self::VideoAnalyticsGetExcluded => video_analytics::get_excluded(ctx).await,
            Self::VideoAnalyticsExclude => video_analytics::exclude(ctx).await,
            Self::VideoAnalyticsRestoreExcluded => video_analytics::restore_excluded(ctx).await,
        }
    }
}

/// Resolves a resource/operation name pair.
///
/// # Errors
///
/// Returns `UnsupportedResource` for an unknown resource, or
/// `UnsupportedOperation` for an unknown operation of a known one.
pub fn resolve(resource: &str, operation: &str) -> Result<Operation> {
    resource.parse::<Resource>()?.operation(operation)
}

/// Resolves and runs one invocation dated to the local calendar day.
///
/// # Errors
///
/// Returns the resolution error, or the handler's error.
pub async fn dispatch(
    transport: &dyn Transport,
    resource: &str,
    operation: &str,
    params: &Parameters,
) -> Result<OperationOutput> {
    dispatch_with(&OperationContext::new(transport, params), resource, operation).await
}

/// Resolves and runs one invocation in an explicit context.
///
/// # Errors
///
/// Returns the resolution error, or the handler's error.
pub async fn dispatch_with(
    ctx: &OperationContext<'_>,
    resource: &str,
    operation: &str,
) -> Result<OperationOutput> {
    let handler = resolve(resource, operation)?;
    debug!(resource, operation, "dispatching");
    handler.execute(ctx).await
}
