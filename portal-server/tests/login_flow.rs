//! Login state machine against an in-memory employee directory

use std::sync::Mutex;

use portal_server::config::NicknamePolicy;
use portal_server::error::{ServiceError, ServiceResult};
use portal_server::login::{EmployeeDirectory, LoginFlow, LoginState, change_nickname};
use shared::error::ErrorCode;
use shared::models::{Employee, EmployeeRole, LoginRecord, RoleCategory};
use shared::session::{IdentifyOutcome, NicknameChange};

#[derive(Default)]
struct MemoryDirectory {
    employees: Mutex<Vec<Employee>>,
    logins: Mutex<Vec<LoginRecord>>,
}

impl MemoryDirectory {
    fn with(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
            logins: Mutex::new(Vec::new()),
        }
    }

    fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }

    fn get(&self, id: &str) -> Employee {
        self.employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.employee_id == id)
            .cloned()
            .unwrap()
    }
}

impl EmployeeDirectory for MemoryDirectory {
    async fn find_employee(&self, employee_id: &str) -> ServiceResult<Option<Employee>> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn shortname_holder(&self, shortname: &str) -> ServiceResult<Option<String>> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.shortname.as_deref() == Some(shortname))
            .map(|e| e.employee_id.clone()))
    }

    async fn save_login_identity(
        &self,
        employee_id: &str,
        nickname: &str,
        shortname: &str,
        now: i64,
    ) -> ServiceResult<Employee> {
        let mut employees = self.employees.lock().unwrap();
        let e = employees
            .iter_mut()
            .find(|e| e.employee_id == employee_id)
            .expect("employee exists");
        e.nickname = Some(nickname.to_string());
        e.shortname = Some(shortname.to_string());
        e.nickname_set_at = Some(now);
        e.updated_at = now;
        Ok(e.clone())
    }

    async fn append_login(&self, record: &LoginRecord) -> ServiceResult<()> {
        self.logins.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn employee(id: &str, name: &str, nickname: Option<&str>, shortname: Option<&str>) -> Employee {
    Employee {
        employee_id: id.into(),
        name: name.into(),
        job_title: "美容師".into(),
        role_category: RoleCategory::Beautician,
        nickname: nickname.map(String::from),
        shortname: shortname.map(String::from),
        nickname_set_at: nickname.map(|_| 1),
        role: EmployeeRole::User,
        can_edit_records: false,
        created_at: 0,
        updated_at: 0,
    }
}

fn code(err: ServiceError) -> ErrorCode {
    err.code().expect("business error")
}

#[tokio::test]
async fn first_login_sets_nickname_and_writes_one_record() {
    let dir = MemoryDirectory::with(vec![employee("X123", "王小明", None, None)]);
    let mut flow = LoginFlow::new(&dir);

    let outcome = flow.identify(" X123 ").await.unwrap().outcome().unwrap();
    assert_eq!(
        outcome,
        IdentifyOutcome::SetupNickname {
            employee_id: "X123".into(),
            name: "王小明".into(),
            suggested_nickname: "王小".into(),
            suggested_shortname: "明".into(),
        }
    );

    let logged_in = flow.setup_nickname("小明", "明").await.unwrap();
    assert_eq!(logged_in.nickname.as_deref(), Some("小明"));
    assert!(matches!(flow.state(), LoginState::Complete { .. }));
    assert_eq!(dir.login_count(), 1);

    let stored = dir.get("X123");
    assert_eq!(stored.nickname.as_deref(), Some("小明"));
    assert_eq!(stored.shortname.as_deref(), Some("明"));
    assert!(stored.nickname_set_at.is_some());

    let logins = dir.logins.lock().unwrap();
    assert_eq!(logins[0].employee_id, "X123");
    assert_eq!(logins[0].employee_name, "王小明");
    assert_eq!(flow.into_employee().unwrap().employee_id, "X123");
}

#[tokio::test]
async fn long_nickname_is_truncated_to_two_characters() {
    let dir = MemoryDirectory::with(vec![employee("E1", "陳美美", None, None)]);
    let mut flow = LoginFlow::new(&dir);
    flow.identify("E1").await.unwrap();
    flow.setup_nickname("  美美美 ", "美").await.unwrap();
    assert_eq!(dir.get("E1").nickname.as_deref(), Some("美美"));
}

#[tokio::test]
async fn unknown_employee_writes_nothing() {
    let dir = MemoryDirectory::with(vec![employee("E1", "陳美美", None, None)]);
    let mut flow = LoginFlow::new(&dir);

    let err = flow.identify("NOPE").await.unwrap_err();
    assert_eq!(code(err), ErrorCode::EmployeeNotFound);
    assert!(matches!(flow.state(), LoginState::IdentifyEmployee));
    assert_eq!(dir.login_count(), 0);
}

#[tokio::test]
async fn empty_employee_id_is_a_validation_error() {
    let dir = MemoryDirectory::default();
    let mut flow = LoginFlow::new(&dir);
    let err = flow.identify("   ").await.unwrap_err();
    assert_eq!(code(err), ErrorCode::RequiredField);
}

#[tokio::test]
async fn wrong_nickname_writes_nothing_and_allows_retry() {
    let dir = MemoryDirectory::with(vec![employee("E1", "陳美美", Some("美美"), Some("美"))]);
    let mut flow = LoginFlow::new(&dir);

    let outcome = flow.identify("E1").await.unwrap().outcome().unwrap();
    assert!(matches!(outcome, IdentifyOutcome::VerifyNickname { .. }));

    for attempt in ["美", "Mm", "美美美"] {
        let err = flow.verify_nickname(attempt).await.unwrap_err();
        assert_eq!(code(err), ErrorCode::NicknameMismatch);
        assert!(matches!(flow.state(), LoginState::VerifyNickname { .. }));
    }
    assert_eq!(dir.login_count(), 0);

    flow.verify_nickname("美美").await.unwrap();
    assert_eq!(dir.login_count(), 1);
}

#[tokio::test]
async fn nickname_match_is_case_sensitive() {
    let dir = MemoryDirectory::with(vec![employee("E2", "Amy Lee", Some("Am"), Some("A"))]);
    let mut flow = LoginFlow::new(&dir);
    flow.identify("E2").await.unwrap();
    assert_eq!(
        code(flow.verify_nickname("am").await.unwrap_err()),
        ErrorCode::NicknameMismatch
    );
    assert!(flow.verify_nickname("Am").await.is_ok());
}

#[tokio::test]
async fn surrounding_whitespace_is_ignored_but_inner_text_must_match() {
    let dir = MemoryDirectory::with(vec![employee("E3", "王小明", Some("小明"), Some("明"))]);
    let mut flow = LoginFlow::new(&dir);
    flow.identify("E3").await.unwrap();

    // Setup stores the trimmed nickname, so input is trimmed the same way
    assert_eq!(
        code(flow.verify_nickname("小 明").await.unwrap_err()),
        ErrorCode::NicknameMismatch
    );
    assert_eq!(dir.login_count(), 0);

    flow.verify_nickname(" 小明 ").await.unwrap();
    assert_eq!(dir.login_count(), 1);
}

#[tokio::test]
async fn shortname_taken_by_someone_else_is_rejected() {
    let dir = MemoryDirectory::with(vec![
        employee("E1", "陳美美", Some("美美"), Some("美")),
        employee("E2", "林美", None, None),
    ]);
    let mut flow = LoginFlow::new(&dir);
    flow.identify("E2").await.unwrap();

    let err = flow.setup_nickname("林美", "美").await.unwrap_err();
    assert_eq!(code(err), ErrorCode::ShortnameTaken);
    assert!(matches!(flow.state(), LoginState::SetupNickname { .. }));
    assert_eq!(dir.login_count(), 0);

    flow.setup_nickname("林美", "林").await.unwrap();
    assert_eq!(dir.login_count(), 1);
}

#[tokio::test]
async fn keeping_your_own_shortname_is_allowed() {
    // Shortname kept after an admin cleared only the nickname
    let dir = MemoryDirectory::with(vec![employee("E1", "陳美美", None, Some("美"))]);
    let mut flow = LoginFlow::new(&dir);
    flow.identify("E1").await.unwrap();
    assert!(flow.setup_nickname("美美", "美").await.is_ok());
}

#[tokio::test]
async fn shortname_length_is_checked() {
    let dir = MemoryDirectory::with(vec![employee("E1", "陳美美", None, None)]);
    let mut flow = LoginFlow::new(&dir);
    flow.identify("E1").await.unwrap();
    assert_eq!(
        code(flow.setup_nickname("美美", "ABCD").await.unwrap_err()),
        ErrorCode::ValidationFailed
    );
    assert_eq!(
        code(flow.setup_nickname("", "美").await.unwrap_err()),
        ErrorCode::RequiredField
    );
    assert_eq!(dir.login_count(), 0);
}

#[tokio::test]
async fn back_returns_to_identify() {
    let dir = MemoryDirectory::with(vec![
        employee("E1", "陳美美", Some("美美"), Some("美")),
        employee("E2", "林美", None, None),
    ]);
    let mut flow = LoginFlow::new(&dir);
    flow.identify("E1").await.unwrap();
    flow.back();
    assert!(matches!(flow.state(), LoginState::IdentifyEmployee));

    flow.identify("E2").await.unwrap();
    assert!(matches!(flow.state(), LoginState::SetupNickname { .. }));
    flow.back();
    assert!(matches!(flow.state(), LoginState::IdentifyEmployee));
    assert!(flow.into_employee().is_none());
}

#[tokio::test]
async fn steps_out_of_order_are_rejected() {
    let dir = MemoryDirectory::with(vec![
        employee("E1", "陳美美", Some("美美"), Some("美")),
        employee("E2", "林美", None, None),
    ]);

    let mut flow = LoginFlow::new(&dir);
    flow.identify("E1").await.unwrap();
    assert_eq!(
        code(flow.setup_nickname("新名", "新").await.unwrap_err()),
        ErrorCode::NicknameAlreadySet
    );

    let mut flow = LoginFlow::new(&dir);
    flow.identify("E2").await.unwrap();
    assert_eq!(
        code(flow.verify_nickname("林美").await.unwrap_err()),
        ErrorCode::NicknameNotSet
    );

    let mut flow = LoginFlow::new(&dir);
    assert_eq!(
        code(flow.verify_nickname("美美").await.unwrap_err()),
        ErrorCode::InvalidRequest
    );
    assert_eq!(dir.login_count(), 0);
}

#[tokio::test]
async fn nickname_change_follows_policy() {
    let dir = MemoryDirectory::with(vec![
        employee("E1", "陳美美", Some("美美"), Some("美")),
        employee("E2", "林美", Some("林美"), Some("林")),
    ]);
    let me = dir.get("E1");
    let change = NicknameChange {
        nickname: "小美".into(),
        shortname: "陳".into(),
    };

    let err = change_nickname(&dir, NicknamePolicy::Locked, &me, &change)
        .await
        .unwrap_err();
    assert_eq!(code(err), ErrorCode::NicknameLocked);
    assert_eq!(dir.get("E1").nickname.as_deref(), Some("美美"));

    let updated = change_nickname(&dir, NicknamePolicy::Changeable, &me, &change)
        .await
        .unwrap();
    assert_eq!(updated.nickname.as_deref(), Some("小美"));
    assert_eq!(updated.shortname.as_deref(), Some("陳"));

    let taken = NicknameChange {
        nickname: "小美".into(),
        shortname: "林".into(),
    };
    let err = change_nickname(&dir, NicknamePolicy::Changeable, &me, &taken)
        .await
        .unwrap_err();
    assert_eq!(code(err), ErrorCode::ShortnameTaken);
    assert_eq!(dir.login_count(), 0);
}
