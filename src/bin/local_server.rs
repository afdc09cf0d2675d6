use chrono::Utc;
use ride_bridge::{
    data_types::sync::{SyncRequest, SyncResponse},
    App,
};
use rocket::http::{ContentType, Status};

#[macro_use]
extern crate rocket;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin-Resource-Sharing Fairing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, PATCH, PUT, DELETE, HEAD, OPTIONS, GET",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[options("/<_..>")]
fn all_options() {
    /* Intentionally left empty */
}

fn json_response(status: Status, response: &SyncResponse) -> (Status, (ContentType, String)) {
    match serde_json::to_string(response) {
        Ok(body) => (status, (ContentType::JSON, body)),
        Err(e) => (
            Status::InternalServerError,
            (ContentType::Text, e.to_string()),
        ),
    }
}

#[put("/api/synchronize/peloton-to-garmin", data = "<body>")]
async fn synchronize_peloton_to_garmin(body: String) -> (Status, (ContentType, String)) {
    let request: SyncRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            return json_response(
                Status::BadRequest,
                &SyncResponse::from_error(format!("Malformed request: {}", e)),
            )
        }
    };

    let app = match App::from_request(&request) {
        Ok(app) => app,
        Err(e) => return json_response(Status::Ok, &SyncResponse::from_error(e)),
    };

    // Sync talks to both platforms over blocking HTTP.
    match tokio::task::spawn_blocking(move || app.sync(Utc::now())).await {
        Ok(response) => json_response(Status::Ok, &response),
        Err(e) => json_response(
            Status::InternalServerError,
            &SyncResponse::from_error(format!("Sync worker failed: {}", e)),
        ),
    }
}

#[launch]
fn rocket() -> _ {
    rocket::build()
        .attach(Cors)
        .mount("/", routes![synchronize_peloton_to_garmin, all_options])
}
