//! Scripted shell sessions

use serde_json::json;
use serial_test::serial;

use pg_admin::handlers::run_shell;

use crate::helpers::*;

async fn run_script(ctx: &TestContext, script: &str) -> String {
    let mut app = ctx.app().await.unwrap();
    let mut out = Vec::new();
    run_shell(&mut app, script.as_bytes(), &mut out).await.unwrap();
    app.shutdown();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
#[serial]
async fn test_resources_require_login() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_list("/getDetailsof/guests", guests_json()).await;

    let output = run_script(&ctx, "guests\nprofile\nquit\n").await;
    assert!(output.contains("Please log in first."));
    assert_eq!(ctx.api_mock.count_requests("GET", "/getDetailsof/guests").await, 0);
}

#[tokio::test]
#[serial]
async fn test_login_browse_and_logout() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_login(ADMIN_EMAIL, ADMIN_PASSWORD, admin_user()).await;
    ctx.api_mock.mock_list("/getDetailsof/guests", guests_json()).await;
    ctx.api_mock.mock_list("/reviews", reviews_json()).await;

    let script = format!(
        "# staff session\nlogin {} {}\nprofile\nguests search ALICE\nreviews summary\nlogout\nreviews\n",
        ADMIN_EMAIL, ADMIN_PASSWORD
    );
    let output = run_script(&ctx, &script).await;

    assert!(output.contains("Welcome back, Warden!"), "{}", output);
    assert!(output.contains("Email address:  admin@girlspg.com"));
    assert!(output.contains("User ID:        u-1"));
    assert!(output.contains("Alice Thomas"));
    assert!(!output.contains("Bina Paul"));
    assert!(output.contains("Average rating: 4.5"));
    assert!(output.contains("Goodbye, Warden."));
    assert!(output.trim_end().ends_with("Please log in first.\npg-admin>"), "{}", output);
}

#[tokio::test]
#[serial]
async fn test_loading_notice_before_list() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_login(ADMIN_EMAIL, ADMIN_PASSWORD, admin_user()).await;
    ctx.api_mock.mock_list("/getDetailsof/guests", guests_json()).await;

    let script = format!("login {} {}\nguests\nguests refresh\nquit\n", ADMIN_EMAIL, ADMIN_PASSWORD);
    let output = run_script(&ctx, &script).await;

    assert_eq!(output.matches("Loading guests...").count(), 2, "{}", output);
    let notice = output.find("Loading guests...").unwrap();
    let listing = output.find("Alice Thomas").unwrap();
    assert!(notice < listing);
}

#[tokio::test]
#[serial]
async fn test_failed_logins_report_lock() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_login(ADMIN_EMAIL, ADMIN_PASSWORD, admin_user()).await;

    let script = format!(
        "login {e} nope\nlogin {e} nope\nlogin {e} nope\nlogin {e} {p}\nlockout\n",
        e = ADMIN_EMAIL,
        p = ADMIN_PASSWORD
    );
    let output = run_script(&ctx, &script).await;

    assert!(output.contains("2 attempt(s) left before login is locked."));
    assert!(output.contains("1 attempt(s) left before login is locked."));
    assert!(output.contains("Login is locked for 60 seconds."));
    assert!(output.contains("Too many failed attempts. Please wait"));
    assert!(output.contains("Next lock:        120 seconds"));
    assert_eq!(ctx.api_mock.count_requests("POST", "/loginWithEmail").await, 3);

    // A new shell picks the lock up from the state file
    let output = run_script(&ctx, &format!("login {} {}\n", ADMIN_EMAIL, ADMIN_PASSWORD)).await;
    assert!(output.contains("Too many failed attempts."));
    assert_eq!(ctx.api_mock.count_requests("POST", "/loginWithEmail").await, 3);
}

#[tokio::test]
#[serial]
async fn test_guest_form_through_shell() {
    let ctx = TestContext::new().await.unwrap();
    ctx.api_mock.mock_login(ADMIN_EMAIL, ADMIN_PASSWORD, admin_user()).await;
    ctx.api_mock.mock_list("/getDetailsof/guests", guests_json()).await;
    ctx.api_mock.mock_status("POST", "/add/guests", 201, json!({ "_id": "g-9" })).await;

    let form_path = ctx.temp_dir.path().join("guest.toml");
    std::fs::write(
        &form_path,
        r#"
name = "Deepa Menon"
email = "deepa@example.com"
contact = "+91 9876543210"
location = "Kochi"
dob = "2002-01-15"
guardianName = "Lakshmi Menon"
guardianContact = "+91 9876500000"
emergencyContactName = "Ravi Menon"
emergencyContactRelation = "Brother"
emergencyContactNumber = "+91 9876511111"
occupationCourse = "MBA"
expectedDateTo = "2025-06-30"
"#,
    )
    .unwrap();

    let script = format!(
        "login {} {}\nguests add\nguests fill {}\nguests submit\nguests set amountPaid 8500\nguests submit\n",
        ADMIN_EMAIL,
        ADMIN_PASSWORD,
        form_path.display()
    );
    let output = run_script(&ctx, &script).await;

    assert!(output.contains("amountPaid: Amount paid must be greater than 0"), "{}", output);
    assert!(output.contains("amountPaid updated."));
    assert!(output.contains("Guest saved."));
    // The post-save reload is announced too
    let saved = output.find("Guest saved.").unwrap();
    assert!(output[..saved].rfind("Loading guests...").is_some());
    assert_eq!(ctx.api_mock.count_requests("POST", "/add/guests").await, 1);
}

#[tokio::test]
#[serial]
async fn test_unknown_command_keeps_shell_running() {
    let ctx = TestContext::new().await.unwrap();
    let output = run_script(&ctx, "dance\nhelp\nexit\nstatus\n").await;

    assert!(output.contains("error:"));
    assert!(output.contains("guests"));
    // Nothing after `exit` runs
    assert!(!output.contains("Lockout state:"));
}
