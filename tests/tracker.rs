#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;
    use test_context::{test_context, AsyncTestContext};
    use timegit::api::{Activity, KimaiConfig, NewActivity, NewTimesheet, Project, Timesheet, TimesheetApi, TimesheetError};
    use timegit::libs::config::Config;
    use timegit::libs::git::{ActivityContext, DEFAULT_BRANCHES};
    use timegit::libs::tracker::{Resolution, Tracker};

    const PROJECT: &str = "webshop";
    const PROJECT_ID: u32 = 7;

    fn timesheet(id: u32) -> Timesheet {
        Timesheet {
            id,
            begin: None,
            description: None,
        }
    }

    fn activity(id: u32, name: &str) -> Activity {
        Activity { id, name: name.to_string() }
    }

    /// In-memory timesheet service recording every call it receives.
    #[derive(Default)]
    struct MockApi {
        activities: RefCell<Vec<(u32, Activity)>>,
        active: Vec<Timesheet>,
        recent: Vec<Timesheet>,
        projects: Vec<Project>,
        calls: RefCell<Vec<String>>,
        started: RefCell<Option<NewTimesheet>>,
        next_activity_id: Cell<u32>,
        started_id: u32,
        failing_stop: Option<u32>,
        failing_find: Option<&'static str>,
        zero_id_create: bool,
        zero_id_stop: bool,
        zero_id_restart: bool,
    }

    impl MockApi {
        fn with_activities(activities: &[(u32, Activity)]) -> Self {
            Self {
                activities: RefCell::new(activities.to_vec()),
                next_activity_id: Cell::new(500),
                started_id: 100,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl TimesheetApi for MockApi {
        async fn find_activities(&self, term: &str, project_id: u32) -> Result<Vec<Activity>> {
            self.record(format!("find {} {}", term, project_id));
            if self.failing_find == Some(term) {
                return Err(TimesheetError::Api {
                    status: 500,
                    message: "search unavailable".to_string(),
                }
                .into());
            }
            Ok(self
                .activities
                .borrow()
                .iter()
                .filter(|(project, activity)| *project == project_id && activity.name.contains(term))
                .map(|(_, activity)| activity.clone())
                .collect())
        }

        async fn create_activity(&self, new_activity: &NewActivity) -> Result<Activity> {
            self.record(format!("create {} {}", new_activity.name, new_activity.project));
            assert!(new_activity.visible && new_activity.billable);
            if self.zero_id_create {
                return Ok(activity(0, &new_activity.name));
            }
            let created = activity(self.next_activity_id.get(), &new_activity.name);
            self.next_activity_id.set(self.next_activity_id.get() + 1);
            self.activities.borrow_mut().push((new_activity.project, created.clone()));
            Ok(created)
        }

        async fn start_timesheet(&self, new_timesheet: &NewTimesheet) -> Result<Timesheet> {
            self.record(format!("start {} {}", new_timesheet.project, new_timesheet.activity));
            *self.started.borrow_mut() = Some(new_timesheet.clone());
            Ok(timesheet(self.started_id))
        }

        async fn active_timesheets(&self) -> Result<Vec<Timesheet>> {
            self.record("active".to_string());
            Ok(self.active.clone())
        }

        async fn stop_timesheet(&self, id: u32) -> Result<Timesheet> {
            self.record(format!("stop {}", id));
            if self.failing_stop == Some(id) {
                return Err(TimesheetError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }
                .into());
            }
            Ok(timesheet(if self.zero_id_stop { 0 } else { id }))
        }

        async fn recent_timesheets(&self, size: u32) -> Result<Vec<Timesheet>> {
            self.record(format!("recent {}", size));
            Ok(self.recent.iter().take(size as usize).cloned().collect())
        }

        async fn restart_timesheet(&self, id: u32) -> Result<Timesheet> {
            self.record(format!("restart {}", id));
            Ok(timesheet(if self.zero_id_restart { 0 } else { id + 1000 }))
        }

        async fn projects(&self) -> Result<Vec<Project>> {
            Ok(self.projects.clone())
        }
    }

    struct TrackerTestContext {
        config: Config,
        branch_context: ActivityContext,
        project_context: ActivityContext,
    }

    impl AsyncTestContext for TrackerTestContext {
        async fn setup() -> Self {
            let config = Config {
                kimai: Some(KimaiConfig {
                    api_url: "https://kimai.example.com/api".to_string(),
                    username: "jane".to_string(),
                    api_token: "secret".to_string(),
                    hourly_rate: 85,
                }),
                projects: BTreeMap::from([(PROJECT.to_string(), PROJECT_ID)]),
                ..Config::default()
            };

            TrackerTestContext {
                config,
                branch_context: ActivityContext::new(PROJECT, "feature/login", &DEFAULT_BRANCHES),
                project_context: ActivityContext::new(PROJECT, "master", &DEFAULT_BRANCHES),
            }
        }
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_branch_activity_is_used_when_it_exists(ctx: &mut TrackerTestContext) {
        let api = MockApi::with_activities(&[(PROJECT_ID, activity(11, "feature/login")), (PROJECT_ID, activity(12, PROJECT))]);
        let tracker = Tracker::new(api, ctx.config.clone());

        let (found, resolution) = tracker.resolve_activity(&ctx.branch_context).await.unwrap();

        assert_eq!(found.id, 11);
        assert_eq!(resolution, Resolution::Branch);
        assert_eq!(tracker.api().calls(), vec!["find feature/login 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_missing_branch_activity_falls_back_to_project(ctx: &mut TrackerTestContext) {
        let api = MockApi::with_activities(&[(PROJECT_ID, activity(12, PROJECT))]);
        let tracker = Tracker::new(api, ctx.config.clone());

        let (found, resolution) = tracker.resolve_activity(&ctx.branch_context).await.unwrap();

        assert_eq!(found.id, 12);
        assert_eq!(resolution, Resolution::ProjectDefault);
        assert_eq!(tracker.api().calls(), vec!["find feature/login 7", "find webshop 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_missing_project_activity_is_created(ctx: &mut TrackerTestContext) {
        let tracker = Tracker::new(MockApi::with_activities(&[]), ctx.config.clone());

        let (found, resolution) = tracker.resolve_activity(&ctx.branch_context).await.unwrap();

        assert_eq!(found, activity(500, PROJECT));
        assert_eq!(resolution, Resolution::CreatedDefault);
        assert_eq!(tracker.api().calls(), vec!["find feature/login 7", "find webshop 7", "create webshop 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_project_level_context_creates_without_second_lookup(ctx: &mut TrackerTestContext) {
        let tracker = Tracker::new(MockApi::with_activities(&[]), ctx.config.clone());

        let (_, resolution) = tracker.resolve_activity(&ctx.project_context).await.unwrap();

        assert_eq!(resolution, Resolution::CreatedDefault);
        assert_eq!(tracker.api().calls(), vec!["find webshop 7", "create webshop 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_created_default_is_found_on_next_start(ctx: &mut TrackerTestContext) {
        let tracker = Tracker::new(MockApi::with_activities(&[]), ctx.config.clone());

        let first = tracker.resolve_activity(&ctx.project_context).await.unwrap();
        let second = tracker.resolve_activity(&ctx.project_context).await.unwrap();

        assert_eq!(first.1, Resolution::CreatedDefault);
        assert_eq!(second.1, Resolution::ProjectDefault);
        assert_eq!(first.0, second.0);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_activity_with_zero_id_counts_as_missing(ctx: &mut TrackerTestContext) {
        let api = MockApi::with_activities(&[(PROJECT_ID, activity(0, "feature/login")), (PROJECT_ID, activity(12, PROJECT))]);
        let tracker = Tracker::new(api, ctx.config.clone());

        let (found, resolution) = tracker.resolve_activity(&ctx.branch_context).await.unwrap();

        assert_eq!(found.id, 12);
        assert_eq!(resolution, Resolution::ProjectDefault);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_exact_name_wins_among_substring_matches(ctx: &mut TrackerTestContext) {
        let api = MockApi::with_activities(&[(PROJECT_ID, activity(21, "login")), (PROJECT_ID, activity(22, "login-v2"))]);
        let tracker = Tracker::new(api, ctx.config.clone());

        let found = tracker.fetch_activity("login", PROJECT_ID).await.unwrap();

        assert_eq!(found.id, 21);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_ambiguous_lookup_does_not_fall_back(ctx: &mut TrackerTestContext) {
        let api = MockApi::with_activities(&[(PROJECT_ID, activity(21, "fix/login-a")), (PROJECT_ID, activity(22, "fix/login-b"))]);
        let tracker = Tracker::new(api, ctx.config.clone());
        let context = ActivityContext::new(PROJECT, "fix/login", &DEFAULT_BRANCHES);

        let error = tracker.resolve_activity(&context).await.unwrap_err();

        assert_eq!(
            error.downcast_ref::<TimesheetError>(),
            Some(&TimesheetError::MultipleActivities {
                term: "fix/login".to_string(),
                project_id: PROJECT_ID,
                count: 2,
            })
        );
        assert_eq!(tracker.api().calls(), vec!["find fix/login 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_unmapped_project_is_an_error(ctx: &mut TrackerTestContext) {
        let tracker = Tracker::new(MockApi::with_activities(&[]), ctx.config.clone());
        let context = ActivityContext::new("unknown-repo", "main", &DEFAULT_BRANCHES);

        let error = tracker.resolve_activity(&context).await.unwrap_err();

        assert!(error.to_string().contains("unknown-repo"));
        assert!(tracker.api().calls().is_empty());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_empty_term_is_rejected(ctx: &mut TrackerTestContext) {
        let tracker = Tracker::new(MockApi::with_activities(&[]), ctx.config.clone());

        let error = tracker.fetch_activity("", PROJECT_ID).await.unwrap_err();

        assert_eq!(error.downcast_ref::<TimesheetError>(), Some(&TimesheetError::InvalidLookup));
        assert!(tracker.api().calls().is_empty());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_start_sends_begin_rate_and_ids(ctx: &mut TrackerTestContext) {
        let api = MockApi::with_activities(&[(PROJECT_ID, activity(11, "feature/login"))]);
        let tracker = Tracker::new(api, ctx.config.clone());
        let begin = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(9, 15, 3).unwrap();

        let outcome = tracker.start_at(&ctx.branch_context, begin).await.unwrap();

        assert_eq!(outcome.timesheet.id, 100);
        assert_eq!(outcome.project_id, PROJECT_ID);
        assert_eq!(outcome.resolution, Resolution::Branch);
        let sent = tracker.api().started.borrow().clone().unwrap();
        assert_eq!(
            sent,
            NewTimesheet {
                begin: "2024-05-02T09:15:03".to_string(),
                project: PROJECT_ID,
                activity: 11,
                hourly_rate: 85,
            }
        );
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_start_without_timesheet_id_fails(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            started_id: 0,
            ..MockApi::with_activities(&[(PROJECT_ID, activity(11, "feature/login"))])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.start(&ctx.branch_context).await.unwrap_err();

        assert_eq!(error.downcast_ref::<TimesheetError>(), Some(&TimesheetError::MissingId("timesheet started")));
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_stop_stops_every_valid_active_timesheet(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            active: vec![timesheet(41), timesheet(0), timesheet(42)],
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let stopped = tracker.stop().await.unwrap();

        assert_eq!(stopped, vec![timesheet(41), timesheet(42)]);
        assert_eq!(tracker.api().calls(), vec!["active", "stop 41", "stop 42"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_stop_with_nothing_active_is_not_an_error(ctx: &mut TrackerTestContext) {
        let tracker = Tracker::new(MockApi::with_activities(&[]), ctx.config.clone());

        let stopped = tracker.stop().await.unwrap();

        assert!(stopped.is_empty());
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_stop_failure_names_the_timesheet(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            active: vec![timesheet(41), timesheet(42)],
            failing_stop: Some(41),
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.stop().await.unwrap_err();

        assert!(format!("{:#}", error).contains("Failed to stop active timesheet 41"));
        assert_eq!(tracker.api().calls(), vec!["active", "stop 41"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_restart_uses_most_recent_valid_timesheet(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            recent: vec![timesheet(40), timesheet(39)],
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let restarted = tracker.restart().await.unwrap();

        assert_eq!(restarted.id, 1040);
        assert_eq!(tracker.api().calls(), vec!["recent 1", "restart 40"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_restart_without_history_fails(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            recent: vec![timesheet(0)],
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.restart().await.unwrap_err();

        assert_eq!(error.downcast_ref::<TimesheetError>(), Some(&TimesheetError::NoRecentTimesheet));
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_lookup_failure_does_not_fall_back(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            failing_find: Some("feature/login"),
            ..MockApi::with_activities(&[(PROJECT_ID, activity(12, PROJECT))])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.resolve_activity(&ctx.branch_context).await.unwrap_err();

        assert_eq!(
            error.downcast_ref::<TimesheetError>(),
            Some(&TimesheetError::Api {
                status: 500,
                message: "search unavailable".to_string(),
            })
        );
        assert_eq!(tracker.api().calls(), vec!["find feature/login 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_failed_project_lookup_keeps_branch_error(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            failing_find: Some(PROJECT),
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.resolve_activity(&ctx.branch_context).await.unwrap_err();

        assert!(matches!(error.downcast_ref::<TimesheetError>(), Some(TimesheetError::Api { status: 500, .. })));
        assert!(format!("{:#}", error).contains("[term: feature/login, project: 7] activity not found"));
        assert_eq!(tracker.api().calls(), vec!["find feature/login 7", "find webshop 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_created_activity_without_id_fails(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            zero_id_create: true,
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.resolve_activity(&ctx.branch_context).await.unwrap_err();

        assert_eq!(error.downcast_ref::<TimesheetError>(), Some(&TimesheetError::MissingId("activity created")));
        let chain = format!("{:#}", error);
        assert!(chain.contains("[term: feature/login, project: 7] activity not found"));
        assert!(chain.contains("Error creating the default project activity for webshop"));
        assert_eq!(tracker.api().calls(), vec!["find feature/login 7", "find webshop 7", "create webshop 7"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_stopped_timesheet_without_id_fails(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            active: vec![timesheet(41), timesheet(42)],
            zero_id_stop: true,
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.stop().await.unwrap_err();

        assert_eq!(error.downcast_ref::<TimesheetError>(), Some(&TimesheetError::MissingId("timesheet stopped")));
        assert_eq!(error.to_string(), "Failed to stop active timesheet 41");
        assert_eq!(tracker.api().calls(), vec!["active", "stop 41"]);
    }

    #[test_context(TrackerTestContext)]
    #[tokio::test]
    async fn test_restarted_timesheet_without_id_fails(ctx: &mut TrackerTestContext) {
        let api = MockApi {
            recent: vec![timesheet(40)],
            zero_id_restart: true,
            ..MockApi::with_activities(&[])
        };
        let tracker = Tracker::new(api, ctx.config.clone());

        let error = tracker.restart().await.unwrap_err();

        assert_eq!(error.downcast_ref::<TimesheetError>(), Some(&TimesheetError::MissingId("timesheet restarted")));
        assert_eq!(tracker.api().calls(), vec!["recent 1", "restart 40"]);
    }
}
