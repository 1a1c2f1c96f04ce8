use crate::infra::build_stack;
use axum::body::Bytes;
use clap::Args;
use hr_records::config::{AuthConfig, UploadConfig};
use hr_records::error::AppError;
use hr_records::hr::domain::{
    EmployeeStatusUpdate, EmployeeSubmission, EnumField, FieldInput, LeaveStatusUpdate,
    LeaveSubmission, LoginRequest, RegistrationRequest,
};
use hr_records::hr::uploads::IncomingFile;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory for the demo resume and leave document. Defaults to a temp directory.
    #[arg(long)]
    pub(crate) upload_dir: Option<PathBuf>,
    /// Email used for the demo HR account.
    #[arg(long, default_value = "hr.demo@example.com")]
    pub(crate) email: String,
    /// Stop after intake and skip the leave request portion.
    #[arg(long)]
    pub(crate) skip_leave: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        upload_dir,
        email,
        skip_leave,
    } = args;

    let upload_dir = upload_dir.unwrap_or_else(|| std::env::temp_dir().join("hr-records-demo"));
    let stack = build_stack(
        &AuthConfig::with_secret("demo-secret"),
        &UploadConfig::at(upload_dir.clone()),
    );

    println!("HR records demo (uploads in {})", upload_dir.display());

    let registration = RegistrationRequest {
        full_name: Some("Demo Recruiter".to_string()),
        email: Some(email.clone()),
        password: Some("demo-pass".to_string()),
        confirm_password: Some("demo-pass".to_string()),
    };
    let account = match stack.auth.register(registration) {
        Ok(account) => account,
        Err(err) => {
            println!("  Registration rejected: {}", err);
            return Ok(());
        }
    };
    println!("- Registered {} ({})", account.full_name, account.id);

    let login = LoginRequest {
        email: Some(email),
        password: Some("demo-pass".to_string()),
    };
    match stack.auth.login(login) {
        Ok(outcome) => println!(
            "  Issued access token ({} chars) and refresh token ({} chars)",
            outcome.tokens.access_token.len(),
            outcome.tokens.refresh_token.len()
        ),
        Err(err) => {
            println!("  Login rejected: {}", err);
            return Ok(());
        }
    }

    println!("\nEmployee intake");
    let submission = EmployeeSubmission {
        full_name: Some("Jane Doe".to_string()),
        email: Some("jane@x.com".to_string()),
        phone_number: Some("9876543210".to_string()),
        position: Some("junior".to_string()),
        experience: Some(FieldInput::Integer(2)),
        declaration: Some(FieldInput::Bool(true)),
        status: Some("hired".to_string()),
        ..EmployeeSubmission::default()
    };
    let resume = demo_file("resume", "jane-doe.pdf");
    let employee = match stack.employees.create(submission, Some(resume)) {
        Ok(record) => record,
        Err(err) => {
            println!("  Intake rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Created {} -> status {} (unknown status replaced), attendance {}",
        employee.full_name,
        employee.status.label(),
        employee.attendance_status.label()
    );
    println!("  Resume stored at {}", employee.resume);

    let strict = EmployeeStatusUpdate {
        email: Some(employee.email.clone()),
        status: Some("hired".to_string()),
        ..EmployeeStatusUpdate::default()
    };
    if let Err(err) = stack.employees.update_status(strict) {
        println!("  Strict update refused unknown status: {}", err);
    }

    let scheduled = EmployeeStatusUpdate {
        email: Some(employee.email.clone()),
        status: Some("scheduled".to_string()),
        joining_date: Some("2025-04-01".to_string()),
        department: Some("Platform".to_string()),
        ..EmployeeStatusUpdate::default()
    };
    match stack.employees.update_status(scheduled) {
        Ok(record) => println!(
            "- Moved to {} | joining {} | department {}",
            record.status.label(),
            record
                .joining_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            record.department.unwrap_or_default()
        ),
        Err(err) => println!("  Status update failed: {}", err),
    }

    if skip_leave {
        return Ok(());
    }

    println!("\nLeave request");
    let leave = LeaveSubmission {
        employee_name: Some(employee.full_name.clone()),
        designation: Some(employee.position.label().to_string()),
        leave_date: Some("2025-05-12".to_string()),
        document: None,
        reason: Some("Family event".to_string()),
    };
    let request = match stack
        .leaves
        .create(leave, Some(demo_file("document", "invitation.pdf")))
    {
        Ok(record) => record,
        Err(err) => {
            println!("  Leave request rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Requested leave on {} -> {}",
        request.leave_date,
        request.status.label()
    );

    let approval = LeaveStatusUpdate {
        status: Some("approved".to_string()),
    };
    match stack.leaves.update_status(request.id.as_str(), approval) {
        Ok(record) => println!("  Leave request {} successfully", record.status.label()),
        Err(err) => println!("  Approval failed: {}", err),
    }

    match stack.leaves.list_on_leave() {
        Ok(records) => println!("- {} employee(s) currently on leave", records.len()),
        Err(err) => println!("  On-leave listing unavailable: {}", err),
    }

    println!(
        "\nStore now holds {} employee record(s) and {} leave request(s)",
        stack.store.employee_count(),
        stack.store.leave_count()
    );
    Ok(())
}

fn demo_file(field: &str, name: &str) -> IncomingFile {
    IncomingFile {
        field: field.to_string(),
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes: Bytes::from_static(b"%PDF-1.4\n% demo\n"),
    }
}
