use crate::error::FetchError;
use crate::github::{GithubApi, PER_PAGE, RepoSummary};
use std::collections::BTreeMap;

/// Upper bound on listing pages (up to 1000 repositories).
pub const MAX_PAGES: u32 = 10;

/// Language name to total bytes.
pub type LanguageTotals = BTreeMap<String, u64>;

/// List the user's own repositories, skipping forks and archived ones.
///
/// Stops at the first empty page or after [`MAX_PAGES`]. Any failing page
/// aborts the whole listing.
pub async fn fetch_repos(
    api: &dyn GithubApi,
    username: &str,
) -> Result<Vec<RepoSummary>, FetchError> {
    let mut repos = Vec::new();

    for page in 1..=MAX_PAGES {
        let batch = api.list_repos_page(username, page).await?;
        if batch.is_empty() {
            break;
        }

        tracing::debug!(username, page, count = batch.len(), "listed repositories");
        repos.extend(batch.into_iter().filter(|r| !r.fork && !r.archived));

        if page == MAX_PAGES {
            tracing::info!(username, "stopped listing at {} repositories", MAX_PAGES * PER_PAGE);
        }
    }

    Ok(repos)
}

/// Sum language bytes across every listed repository.
///
/// Repositories whose language query fails are skipped; listing failures propagate.
pub async fn fetch_language_stats(
    api: &dyn GithubApi,
    username: &str,
) -> Result<LanguageTotals, FetchError> {
    let repos = fetch_repos(api, username).await?;
    let mut totals = LanguageTotals::new();

    for repo in &repos {
        match api.repo_languages(&repo.owner.login, &repo.name).await {
            Ok(langs) => add_languages(&mut totals, langs),
            Err(e) => {
                tracing::warn!(
                    owner = %repo.owner.login,
                    repo = %repo.name,
                    "skipping repository: {e}"
                );
            }
        }
    }

    Ok(totals)
}

fn add_languages(totals: &mut LanguageTotals, langs: LanguageTotals) {
    for (lang, bytes) in langs {
        let entry = totals.entry(lang).or_insert(0);
        *entry = entry.saturating_add(bytes);
    }
}
