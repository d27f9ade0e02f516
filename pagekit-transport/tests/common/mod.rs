//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use pagekit_transport::{FormPayload, FormSubmission, HttpFormTransport, HttpTransportConfig};

/// 缺少任一环境变量时提前结束测试
#[macro_export]
macro_rules! skip_if_no_endpoint {
    ($($var:literal),+ $(,)?) => {
        let missing: Vec<&str> = [$($var),+]
            .into_iter()
            .filter(|name| std::env::var(name).is_err())
            .collect();
        if !missing.is_empty() {
            eprintln!("跳过测试: 未设置 {}", missing.join(", "));
            return;
        }
    };
}

/// 解包 `Option`，为 `None` 时测试失败
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {
        require_some!($expr, "{}", stringify!($expr))
    };
    ($expr:expr, $($msg:tt)+) => {
        match $expr {
            Some(value) => value,
            None => panic!("{} returned None", format_args!($($msg)+)),
        }
    };
}

/// 解包 `Result`，为 `Err` 时带错误信息让测试失败
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {
        require_ok!($expr, "{}", stringify!($expr))
    };
    ($expr:expr, $($msg:tt)+) => {
        match $expr {
            Ok(value) => value,
            Err(e) => panic!("{} failed: {e:?}", format_args!($($msg)+)),
        }
    };
}

/// 测试上下文
pub struct TestContext {
    pub transport: HttpFormTransport,
    /// Endpoint that accepts a submission and answers with JSON
    pub accept_url: String,
    /// Endpoint that answers with a non-2xx status
    pub reject_url: Option<String>,
}

impl TestContext {
    /// 从环境变量创建测试上下文
    pub fn from_env() -> Option<Self> {
        let accept_url = env::var("PAGEKIT_TEST_ENDPOINT").ok()?;
        let reject_url = env::var("PAGEKIT_TEST_REJECT_ENDPOINT").ok();
        let transport = HttpFormTransport::new(HttpTransportConfig::default()).ok()?;
        Some(Self {
            transport,
            accept_url,
            reject_url,
        })
    }
}

/// 生成一份典型的报名表单数据
pub fn registration_submission(action: &str) -> FormSubmission {
    let mut payload = FormPayload::new();
    payload.push("name", "Test Visitor");
    payload.push("email", "visitor@example.com");
    payload.push("phone", "+7 (999) 999-99-99");
    payload.push("type_action", "ticket");
    FormSubmission::new(action, payload)
}
