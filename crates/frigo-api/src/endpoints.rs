//! Backend endpoint paths, relative to the configured base URL.

pub const SIGNUP: &str = "/signup/";
pub const LOGIN: &str = "/login/";
pub const FORGOT_PASSWORD: &str = "/forgot-password/";
pub const VERIFY_OTP: &str = "/verify-otp/";
pub const RESET_PASSWORD: &str = "/reset-password/";
pub const REFRESH_TOKEN: &str = "/token/refresh/";
pub const USER_PROFILE: &str = "/user/profile/";

pub const SUBMIT_INTAKE: &str = "/intake/";

pub const ASK_QUESTION: &str = "/ask/";
pub const ANSWER_MCQ: &str = "/mcq-response/";
pub const LIST_SESSIONS: &str = "/sessions/";

pub fn task_status(task_id: &str) -> String {
    format!("/task-status/{}/", task_id)
}

pub fn chat_history(session_id: &str) -> String {
    format!("/history/{}/", session_id)
}

pub fn session_title(session_id: &str) -> String {
    format!("/sessions/{}/title/", session_id)
}

pub fn session_intake(session_id: &str) -> String {
    format!("/sessions/{}/intake/", session_id)
}
