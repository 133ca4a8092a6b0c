/// `autoscale` commands: show, update and remove the autoscale policy of an instance.
use std::io::Write;

use tracing::debug;

use crate::cli::OutputCtx;
use crate::cli::args::{AutoscaleInfoArgs, AutoscaleRemoveArgs, AutoscaleUpdateArgs};
use crate::cli::output::{write_autoscale, write_message};
use crate::config::AppConfig;
use crate::errors::{Operation, RpaasError, ValidationError};
use crate::rpaas::{AutoscalePatch, RpaasClient, ScheduledWindow};
use crate::schedule::CronExpr;

/// Run `rpaasctl autoscale info`.
///
/// # Errors
///
/// Returns `RpaasError::Upstream` if the API call fails, or an output error.
pub fn info(
    args: &AutoscaleInfoArgs,
    config: &AppConfig,
    ctx: &OutputCtx,
    out: &mut dyn Write,
) -> Result<(), RpaasError> {
    let client = RpaasClient::new(config, args.target.service.as_deref())?;

    let _t_get = ctx.timer("get_autoscale");
    let autoscale = client
        .get_autoscale(&args.target.instance)
        .map_err(RpaasError::upstream(Operation::GetAutoscale))?;
    drop(_t_get);

    write_autoscale(out, &autoscale, ctx)
}

/// Run `rpaasctl autoscale remove`.
///
/// # Errors
///
/// Returns `RpaasError::Upstream` if the API call fails.
pub fn remove(
    args: &AutoscaleRemoveArgs,
    config: &AppConfig,
    ctx: &OutputCtx,
    out: &mut dyn Write,
) -> Result<(), RpaasError> {
    let client = RpaasClient::new(config, args.target.service.as_deref())?;

    let _t_remove = ctx.timer("remove_autoscale");
    client
        .remove_autoscale(&args.target.instance)
        .map_err(RpaasError::upstream(Operation::RemoveAutoscale))?;
    drop(_t_remove);

    write_message(
        out,
        &format!(
            "Autoscale of {} successfully removed",
            args.target.qualified_name()
        ),
    )
}

/// Run `rpaasctl autoscale update`.
///
/// Flags are validated before any request is made.
///
/// # Errors
///
/// Returns `RpaasError::Validation` for bad flags and `RpaasError::Upstream`
/// if the API call fails.
pub fn update(
    args: &AutoscaleUpdateArgs,
    config: &AppConfig,
    ctx: &OutputCtx,
    out: &mut dyn Write,
) -> Result<(), RpaasError> {
    let patch = build_patch(args)?;
    let client = RpaasClient::new(config, args.target.service.as_deref())?;

    debug!(instance = %args.target.instance, ?patch, "updating autoscale");
    let _t_update = ctx.timer("update_autoscale");
    client
        .update_autoscale(&args.target.instance, &patch)
        .map_err(RpaasError::upstream(Operation::UpdateAutoscale))?;
    drop(_t_update);

    write_message(
        out,
        &format!(
            "Autoscale of {} successfully updated!",
            args.target.qualified_name()
        ),
    )
}

/// Build the update request from the flags.
///
/// Replica bounds are always sent. Triggers and schedules the caller did not
/// supply stay `None` and are left out of the request body.
///
/// # Errors
///
/// Returns `ValidationError` if `--max` is not above `--min` or a `--schedule`
/// value is malformed.
pub fn build_patch(args: &AutoscaleUpdateArgs) -> Result<AutoscalePatch, ValidationError> {
    let (min, max) = (args.min_replicas, args.max_replicas);
    if max <= min {
        return Err(ValidationError::ReplicaBounds { min, max });
    }

    let schedules = if args.schedules.is_empty() {
        None
    } else {
        let windows = args
            .schedules
            .iter()
            .map(|fragment| parse_window(fragment, max))
            .collect::<Result<Vec<_>, _>>()?;
        Some(windows)
    };

    Ok(AutoscalePatch {
        min_replicas: min,
        max_replicas: max,
        cpu: args.cpu,
        memory: args.memory,
        rps: args.rps,
        schedules,
    })
}

/// Parse one `--schedule` JSON fragment and check its cron expressions.
fn parse_window(fragment: &str, max_replicas: u32) -> Result<ScheduledWindow, ValidationError> {
    let window: ScheduledWindow =
        serde_json::from_str(fragment).map_err(|err| ValidationError::MalformedSchedule {
            fragment: fragment.to_owned(),
            reason: err.to_string(),
        })?;

    for (boundary, expr) in [("start", &window.start), ("end", &window.end)] {
        expr.parse::<CronExpr>()
            .map_err(|source| ValidationError::InvalidCron {
                fragment: fragment.to_owned(),
                boundary,
                source,
            })?;
    }

    if window.min_replicas > max_replicas {
        return Err(ValidationError::WindowAboveMax {
            fragment: fragment.to_owned(),
            min_replicas: window.min_replicas,
            max: max_replicas,
        });
    }

    Ok(window)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::cli::args::InstanceArgs;
    use crate::testing::{MockApi, ROUTES, run_against};

    const WEEKDAYS: &str = r#"{"minReplicas": 1, "start": "00 08 * * 1-5", "end": "00 20 * * 1-5"}"#;
    const LUNCH: &str = r#"{"minReplicas": 3, "start": "00 12 * * 1-5", "end": "00 13 * * 1-5"}"#;

    const INFO: [&str; 6] = ["autoscale", "info", "-s", "my-service", "-i", "my-instance"];
    const REMOVE: [&str; 6] = ["autoscale", "remove", "-s", "my-service", "-i", "my-instance"];

    fn not_found() -> MockApi {
        MockApi::json(
            StatusCode::NOT_FOUND,
            &json!({"Msg": "instance \"my-instance\" not found"}),
        )
    }

    fn update_argv(extra: &[&'static str]) -> Vec<&'static str> {
        let mut argv = vec![
            "autoscale", "update", "-s", "my-service", "-i", "my-instance", "--min", "0", "--max",
            "10",
        ];
        argv.extend_from_slice(extra);
        argv
    }

    fn update_args() -> AutoscaleUpdateArgs {
        AutoscaleUpdateArgs {
            target: InstanceArgs {
                service: Some("my-service".to_owned()),
                instance: "my-instance".to_owned(),
            },
            min_replicas: 0,
            max_replicas: 10,
            cpu: None,
            memory: None,
            rps: None,
            schedules: vec![],
        }
    }

    // --- info ---

    #[test]
    fn test_info_instance_not_found() {
        for route in ROUTES {
            let api = not_found();
            let (result, _) = route.run(&api, &INFO);
            let err = result.unwrap_err();
            assert_eq!(
                err.to_string(),
                "could not get autoscale from RPaaS API: 404 Not Found",
                "{route:?}"
            );
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_info_table() {
        for route in ROUTES {
            let api = MockApi::json(
                StatusCode::OK,
                &json!({"minReplicas": 2, "maxReplicas": 5, "cpu": 50, "memory": 55, "rps": 100}),
            );
            let (result, stdout) = route.run(&api, &INFO);
            result.unwrap();
            assert_eq!(
                stdout,
                "\
min replicas: 2
max replicas: 5
+----------+-----------------+
| Triggers | trigger details |
+----------+-----------------+
| CPU      | 50%             |
| Memory   | 55%             |
| RPS      | 100 req/s       |
+----------+-----------------+
",
                "{route:?}"
            );

            let request = api.single_request();
            assert_eq!(request.method, Method::GET);
            route.assert_target(&request, "autoscale", "");
        }
    }

    #[test]
    fn test_info_json() {
        for route in ROUTES {
            let api = MockApi::json(
                StatusCode::OK,
                &json!({"minReplicas": 2, "maxReplicas": 5, "cpu": 50, "memory": 55, "rps": 100}),
            );
            let mut argv = INFO.to_vec();
            argv.push("--json");
            let (result, stdout) = route.run(&api, &argv);
            result.unwrap();
            assert_eq!(
                stdout,
                "{\n\t\"cpu\": 50,\n\t\"maxReplicas\": 5,\n\t\"memory\": 55,\n\t\"minReplicas\": 2,\n\t\"rps\": 100\n}\n",
                "{route:?}"
            );
        }
    }

    #[test]
    fn test_info_with_basic_auth() {
        let api = MockApi::json(StatusCode::OK, &json!({"minReplicas": 1, "maxReplicas": 3}));
        let (result, stdout) = run_against(
            &api,
            &[
                "--rpaas-user",
                "admin",
                "--rpaas-password",
                "secret",
                "autoscale",
                "info",
                "-i",
                "my-instance",
            ],
        );
        result.unwrap();
        assert_eq!(stdout, "min replicas: 1\nmax replicas: 3\n");
        assert_eq!(
            api.single_request().header("authorization"),
            Some("Basic YWRtaW46c2VjcmV0")
        );
    }

    // --- remove ---

    #[test]
    fn test_remove_instance_not_found() {
        for route in ROUTES {
            let api = not_found();
            let (result, _) = route.run(&api, &REMOVE);
            assert_eq!(
                result.unwrap_err().to_string(),
                "could not delete the autoscale on RPaaS API: 404 Not Found",
                "{route:?}"
            );
        }
    }

    #[test]
    fn test_remove() {
        for route in ROUTES {
            let api = MockApi::empty(StatusCode::NO_CONTENT);
            let (result, stdout) = route.run(&api, &REMOVE);
            result.unwrap();
            assert_eq!(
                stdout,
                "Autoscale of my-service/my-instance successfully removed\n"
            );

            let request = api.single_request();
            assert_eq!(request.method, Method::DELETE);
            route.assert_target(&request, "autoscale", "");
        }
    }

    // --- update ---

    #[test]
    fn test_update_instance_not_found() {
        for route in ROUTES {
            let api = not_found();
            let (result, _) = route.run(&api, &update_argv(&["--cpu", "75"]));
            assert_eq!(
                result.unwrap_err().to_string(),
                "could not update the autoscale on RPaaS API: 404 Not Found",
                "{route:?}"
            );
        }
    }

    #[test]
    fn test_update_sends_only_supplied_triggers() {
        for route in ROUTES {
            let api = MockApi::empty(StatusCode::NO_CONTENT);
            let (result, stdout) = route.run(&api, &update_argv(&["--cpu", "75"]));
            result.unwrap();
            assert_eq!(
                stdout,
                "Autoscale of my-service/my-instance successfully updated!\n"
            );

            let request = api.single_request();
            assert_eq!(request.method, Method::PATCH);
            route.assert_target(&request, "autoscale", "");
            assert_eq!(request.header("content-type"), Some("application/json"));
            assert_eq!(
                request.json(),
                json!({"minReplicas": 0, "maxReplicas": 10, "cpu": 75})
            );
        }
    }

    #[test]
    fn test_update_cpu_and_rps() {
        for route in ROUTES {
            let api = MockApi::empty(StatusCode::NO_CONTENT);
            let (result, _) = route.run(&api, &update_argv(&["--cpu", "80", "--rps", "100"]));
            result.unwrap();
            assert_eq!(
                api.single_request().json(),
                json!({"minReplicas": 0, "maxReplicas": 10, "cpu": 80, "rps": 100})
            );
        }
    }

    #[test]
    fn test_update_replica_bounds_only() {
        let api = MockApi::empty(StatusCode::NO_CONTENT);
        let (result, _) = run_against(&api, &update_argv(&[]));
        result.unwrap();
        assert_eq!(
            api.single_request().json(),
            json!({"minReplicas": 0, "maxReplicas": 10})
        );
    }

    #[test]
    fn test_update_schedules_keep_order() {
        for route in ROUTES {
            let api = MockApi::empty(StatusCode::NO_CONTENT);
            let (result, _) = route.run(
                &api,
                &update_argv(&["--schedule", WEEKDAYS, "--schedule", LUNCH]),
            );
            result.unwrap();
            assert_eq!(
                api.single_request().json(),
                json!({
                    "minReplicas": 0,
                    "maxReplicas": 10,
                    "schedules": [
                        {"minReplicas": 1, "start": "00 08 * * 1-5", "end": "00 20 * * 1-5"},
                        {"minReplicas": 3, "start": "00 12 * * 1-5", "end": "00 13 * * 1-5"},
                    ],
                })
            );
        }
    }

    #[test]
    fn test_update_rejects_bad_schedule_before_request() {
        let api = MockApi::empty(StatusCode::NO_CONTENT);
        let (result, _) = run_against(&api, &update_argv(&["--schedule", "{not json"]));
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("invalid schedule '{not json'"));
        assert_eq!(err.exit_code(), 2);
        assert!(api.requests().is_empty());
    }

    #[test]
    fn test_update_rejects_max_not_above_min_before_request() {
        let api = MockApi::empty(StatusCode::NO_CONTENT);
        let (result, _) = run_against(
            &api,
            &["autoscale", "update", "-i", "my-instance", "--min", "3", "--max", "0"],
        );
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "max replicas (0) must be greater than min replicas (3)"
        );
        assert_eq!(err.exit_code(), 2);
        assert!(api.requests().is_empty());
    }

    // --- build_patch ---

    #[test]
    fn test_patch_rejects_max_not_above_min() {
        let args = AutoscaleUpdateArgs {
            min_replicas: 5,
            max_replicas: 5,
            ..update_args()
        };
        assert!(matches!(
            build_patch(&args),
            Err(ValidationError::ReplicaBounds { min: 5, max: 5 })
        ));
    }

    #[test]
    fn test_patch_rejects_invalid_cron() {
        let fragment = r#"{"minReplicas": 1, "start": "00 25 * * *", "end": "00 20 * * 1-5"}"#;
        let args = AutoscaleUpdateArgs {
            schedules: vec![fragment.to_owned()],
            ..update_args()
        };
        assert!(matches!(
            build_patch(&args),
            Err(ValidationError::InvalidCron {
                boundary: "start",
                ..
            })
        ));
    }

    #[test]
    fn test_patch_rejects_window_above_max() {
        let args = AutoscaleUpdateArgs {
            min_replicas: 1,
            max_replicas: 2,
            schedules: vec![LUNCH.to_owned()],
            ..update_args()
        };
        assert!(matches!(
            build_patch(&args),
            Err(ValidationError::WindowAboveMax {
                min_replicas: 3,
                max: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_patch_memory_trigger() {
        let args = AutoscaleUpdateArgs {
            memory: Some(60),
            ..update_args()
        };
        let patch = build_patch(&args).unwrap();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"minReplicas": 0, "maxReplicas": 10, "memory": 60})
        );
    }
}
