use rouille::Response;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    MethodNotAllowed,
}

impl From<rouille::input::json::JsonError> for ApiError {
    fn from(err: rouille::input::json::JsonError) -> Self {
        ApiError::BadRequest(format!("invalid JSON: {err}"))
    }
}

impl ApiError {
    pub fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => Response::text(msg).with_status_code(404),

            ApiError::BadRequest(msg) => Response::text(msg).with_status_code(400),

            ApiError::MethodNotAllowed => {
                Response::text("method not allowed").with_status_code(405)
            }
        }
    }
}
