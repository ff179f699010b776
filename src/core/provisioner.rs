use crate::core::roster::Roster;
use crate::core::session::AuthenticatedCourse;
use crate::domain::model::{GroupOutcome, IdentifierMap, ProvisionReport};
use crate::domain::ports::CanvasApi;
use crate::utils::error::Result;
use indicatif::{ProgressBar, ProgressStyle};

pub const UNMATCHED_MESSAGE: &str =
    "Some students could not be found in the Canvas course. Their student numbers are:";

#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub group_set_name: String,
    pub group_prefix: String,
    pub show_progress: bool,
}

pub fn group_name(prefix: &str, group_num: &str) -> String {
    format!("{}{}", prefix, group_num)
}

/// Text printed after a run that left students unplaced, or `None` when
/// every student was matched.
pub fn unmatched_summary(unmatched: &[String]) -> Option<String> {
    if unmatched.is_empty() {
        return None;
    }
    Some(format!("{}\n{:?}", UNMATCHED_MESSAGE, unmatched))
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} groups {msg}") {
        bar.set_style(style);
    }
    bar
}

/// Creates a group set on the course, one group per distinct roster group
/// number, and a membership for every student Canvas knows about.
///
/// Students missing from the course are collected in the report and do not
/// stop the run. Any failing API call does, leaving whatever was already
/// created in place.
pub async fn provision_groups<A: CanvasApi>(
    roster: &Roster,
    session: &AuthenticatedCourse<A>,
    options: &ProvisionOptions,
) -> Result<ProvisionReport> {
    let api = &session.api;
    let course_id = session.course.id;

    let category = api
        .create_group_category(course_id, &options.group_set_name)
        .await?;
    tracing::info!("Created group set '{}' ({})", category.name, category.id);

    let users = api.list_course_users(course_id).await?;
    let ids = IdentifierMap::from_users(&users);
    tracing::info!(
        "Fetched {} course users, {} with a student number",
        users.len(),
        ids.len()
    );

    let roster_groups = roster.groups();
    let bar = progress_bar(roster_groups.len(), options.show_progress);
    let mut groups = Vec::with_capacity(roster_groups.len());
    let mut unmatched = Vec::new();

    for roster_group in roster_groups {
        let name = group_name(&options.group_prefix, roster_group.group_num);
        bar.set_message(name.clone());
        let group = api.create_group(&category, &name).await?;
        tracing::debug!("Created group '{}' ({})", group.name, group.id);

        let mut members_added = 0;
        for row in roster_group.rows {
            match ids.lookup(&row.student_number) {
                Some(user_id) => {
                    api.create_membership(&group, user_id).await?;
                    members_added += 1;
                }
                None => {
                    bar.suspend(|| {
                        tracing::warn!(
                            "Student {} is not enrolled in course {}",
                            row.student_number,
                            course_id
                        )
                    });
                    unmatched.push(row.student_number.clone());
                }
            }
        }

        groups.push(GroupOutcome {
            group,
            members_added,
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    if let Some(summary) = unmatched_summary(&unmatched) {
        println!("{}", summary);
    }

    let report = ProvisionReport {
        category,
        groups,
        unmatched,
    };
    tracing::info!(
        "Created {} groups with {} memberships, {} students unmatched",
        report.groups.len(),
        report.memberships_created(),
        report.unmatched.len()
    );
    Ok(report)
}
