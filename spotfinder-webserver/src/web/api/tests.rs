use super::*;

pub mod prelude {
    use crate::web::{self, api};

    pub use crate::adapters::json;
    pub use crate::web::tests::prelude::{LocalResponse as Response, *};
    pub use spotfinder_core::{entities::*, repositories::*};
    pub use spotfinder_entities::builders::*;

    pub fn setup() -> (Client, TestBackend) {
        web::tests::rocket_test_setup(vec![("/", api::routes())])
    }

    pub fn setup_with_cfg(cfg: Cfg) -> (Client, TestBackend) {
        web::tests::rocket_test_setup_with_cfg(vec![("/", api::routes())], cfg)
    }

    pub fn test_json(r: &Response) {
        assert_eq!(
            r.headers().get("Content-Type").collect::<Vec<_>>()[0],
            "application/json"
        );
    }

    pub fn store(backend: &TestBackend, report: &Report) {
        let db = backend.connections.exclusive().unwrap();
        db.transaction(|conn| conn.create_report(report)).unwrap();
    }

    pub fn post_report(client: &Client, body: &str) -> json::Report {
        let res = client
            .post("/reports")
            .header(ContentType::JSON)
            .body(body)
            .dispatch();
        assert_eq!(res.status(), Status::Created);
        serde_json::from_str(&res.into_string().unwrap()).unwrap()
    }

    pub fn rate<'c>(
        client: &'c Client,
        backend: &TestBackend,
        user: &str,
        id: &str,
        body: &str,
    ) -> Response<'c> {
        let auth = Header::new("Authorization", backend.bearer(user));
        client
            .put(format!("/reports/{id}/rate"))
            .header(ContentType::JSON)
            .header(auth)
            .body(body.to_owned())
            .dispatch()
    }

    pub fn error_of(res: Response) -> json::Error {
        serde_json::from_str(&res.into_string().unwrap()).unwrap()
    }
}

use self::prelude::*;

#[test]
fn create_and_get_report() {
    let (client, _) = setup();
    let res = client
        .post("/reports")
        .header(ContentType::JSON)
        .body(r#"{"lat":45.5,"lng":-73.57,"status":"taken","note":"  next to the hydrant "}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Created);
    test_json(&res);
    let body = res.into_string().unwrap();
    assert!(body.contains(r#""totalRatings":0"#));
    assert!(body.contains(r#""isActive":true"#));
    let created: json::Report = serde_json::from_str(&body).unwrap();
    assert_eq!(created.status, json::ReportStatus::Taken);
    assert_eq!(created.note.as_deref(), Some("next to the hydrant"));
    assert_eq!(created.accuracy, 0.0);
    assert_eq!(created.expires_at - created.created_at, 30 * 60 * 1_000);
    assert_eq!(created.created_ago.as_deref(), Some("Just now"));
    assert_eq!(created.distance, None);

    let res = client.get(format!("/reports/{}", created.id)).dispatch();
    assert_eq!(res.status(), Status::Ok);
    let loaded: json::Report = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.created_at, created.created_at);
}

#[test]
fn get_missing_report() {
    let (client, _) = setup();
    let res = client.get("/reports/does-not-exist").dispatch();
    assert_eq!(res.status(), Status::NotFound);
    test_json(&res);
    assert_eq!(error_of(res).http_status, 404);
}

#[test]
fn reject_invalid_reports() {
    let (client, backend) = setup();
    let long_note = "x".repeat(501);
    for body in [
        r#"{"lat":100.0,"lng":0.0,"status":"available"}"#.to_owned(),
        r#"{"lat":0.0,"lng":181.0,"status":"available"}"#.to_owned(),
        r#"{"lat":0.0,"lng":0.0,"status":"free"}"#.to_owned(),
        format!(r#"{{"lat":0.0,"lng":0.0,"status":"available","note":"{long_note}"}}"#),
        r#"{"lat":0.0,"status":"available"}"#.to_owned(),
        "no json".to_owned(),
    ] {
        let res = client
            .post("/reports")
            .header(ContentType::JSON)
            .body(&body)
            .dispatch();
        assert_eq!(res.status(), Status::BadRequest, "{body}");
        assert_eq!(error_of(res).http_status, 400);
    }
    let db = backend.connections.shared().unwrap();
    let bbox = MapBbox::centered_at(MapPoint::from_lat_lng_deg(0.0, 0.0), Distance::from_meters(1e6));
    assert!(db
        .find_live_reports_in_bbox(&bbox, Timestamp::now())
        .unwrap()
        .is_empty());
}

#[test]
fn accept_legacy_field_names() {
    let (client, _) = setup();
    let created = post_report(
        &client,
        r#"{"latitude":45.5,"longitude":-73.57,"status":"available","description":"corner"}"#,
    );
    assert_eq!(created.note.as_deref(), Some("corner"));
}

#[test]
fn anonymous_reports_can_be_disabled() {
    let (client, backend) = setup_with_cfg(Cfg {
        anonymous_reports: false,
        jwt_secret: Some(JWT_SECRET.into()),
        ..Default::default()
    });
    let body = r#"{"lat":45.5,"lng":-73.57,"status":"available"}"#;
    let res = client
        .post("/reports")
        .header(ContentType::JSON)
        .body(body)
        .dispatch();
    assert_eq!(res.status(), Status::Unauthorized);

    let res = client
        .post("/reports")
        .header(ContentType::JSON)
        .header(Header::new("Authorization", backend.bearer("alice")))
        .body(body)
        .dispatch();
    assert_eq!(res.status(), Status::Created);
    let created: json::Report = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    let stored = backend
        .connections
        .shared()
        .unwrap()
        .get_report(&created.id)
        .unwrap();
    assert_eq!(stored.owner, Some("alice".into()));
}

#[test]
fn nearby_reports_sorted_by_distance() {
    let (client, backend) = setup();
    let far = post_report(&client, r#"{"lat":45.503,"lng":-73.57,"status":"available"}"#);
    let near = post_report(&client, r#"{"lat":45.5001,"lng":-73.5702,"status":"taken"}"#);
    post_report(&client, r#"{"lat":45.6,"lng":-73.57,"status":"available"}"#);
    store(
        &backend,
        &Report::build()
            .lat_lng(45.5, -73.57)
            .expires_at(Timestamp::now() - time::Duration::seconds(1))
            .finish(),
    );

    let res = client
        .get("/reports/nearby?lat=45.50&lng=-73.57&radius=500")
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    test_json(&res);
    let found: Vec<json::Report> = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    let ids: Vec<_> = found.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![near.id.as_str(), far.id.as_str()]);

    let d = found[0].distance.unwrap();
    assert!(d > 15.0 && d < 25.0);
    assert_eq!((d * 10.0).round() / 10.0, d);
    assert!(found[1].distance.unwrap() > 300.0);
    assert!(found.iter().all(|r| r.created_ago.is_some()));
}

#[test]
fn nearby_reports_with_default_and_invalid_radius() {
    let (client, _) = setup();
    post_report(&client, r#"{"lat":45.5001,"lng":-73.5702,"status":"taken"}"#);
    let res = client.get("/reports/nearby?lat=45.5&lng=-73.57").dispatch();
    assert_eq!(res.status(), Status::Ok);
    let found: Vec<json::Report> = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    assert_eq!(found.len(), 1);

    let res = client
        .get("/reports/nearby?lat=45.5&lng=-73.57&radius=0")
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);
    let res = client.get("/reports/nearby?lat=95&lng=-73.57").dispatch();
    assert_eq!(res.status(), Status::BadRequest);
}

#[test]
fn rate_reports() {
    let (client, backend) = setup();
    let report = post_report(&client, r#"{"lat":45.5,"lng":-73.57,"status":"available"}"#);

    let res = client
        .put(format!("/reports/{}/rate", report.id))
        .header(ContentType::JSON)
        .body(r#"{"value":1}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Unauthorized);

    assert_eq!(rate(&client, &backend, "u1", &report.id, r#"{"value":1}"#).status(), Status::Ok);
    assert_eq!(
        rate(&client, &backend, "u2", &report.id, r#"{"isUpvote":true}"#).status(),
        Status::Ok
    );
    let res = rate(&client, &backend, "u3", &report.id, r#"{"value":-1}"#);
    assert_eq!(res.status(), Status::Ok);
    let rated: json::RatingResult = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    assert_eq!(
        rated,
        json::RatingResult {
            id: report.id.clone(),
            accuracy: 0.3,
            total_ratings: 3
        }
    );

    let res = rate(&client, &backend, "u1", &report.id, r#"{"value":-1}"#);
    assert_eq!(res.status(), Status::Conflict);
    assert_eq!(error_of(res).http_status, 409);

    let res = rate(&client, &backend, "u4", &report.id, r#"{"value":2}"#);
    assert_eq!(res.status(), Status::BadRequest);

    let res = rate(&client, &backend, "u4", "missing", r#"{"value":1}"#);
    assert_eq!(res.status(), Status::NotFound);

    let res = client.get(format!("/reports/{}", report.id)).dispatch();
    let loaded: json::Report = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    assert_eq!(loaded.total_ratings, 3);
    assert_eq!(loaded.accuracy, 0.3);
}

#[test]
fn rate_expired_report() {
    let (client, backend) = setup();
    let expired = Report::build()
        .expires_at(Timestamp::now() - time::Duration::seconds(1))
        .finish();
    store(&backend, &expired);
    let res = rate(&client, &backend, "u1", expired.id.as_str(), r#"{"value":1}"#);
    assert_eq!(res.status(), Status::Gone);
    assert_eq!(error_of(res).http_status, 410);
}

#[test]
fn manage_favorites() {
    let (client, backend) = setup();
    let first = post_report(&client, r#"{"lat":45.5,"lng":-73.57,"status":"available"}"#);
    let second = post_report(&client, r#"{"lat":45.5,"lng":-73.57,"status":"taken"}"#);
    let auth = || Header::new("Authorization", backend.bearer("alice"));

    let res = client.get("/favorites").dispatch();
    assert_eq!(res.status(), Status::Unauthorized);
    let res = client
        .post(format!("/reports/{}/favorite", first.id))
        .dispatch();
    assert_eq!(res.status(), Status::Unauthorized);

    for id in [&first.id, &second.id] {
        let res = client
            .post(format!("/reports/{id}/favorite"))
            .header(auth())
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
    }
    let res = client
        .post(format!("/reports/{}/favorite", first.id))
        .header(auth())
        .dispatch();
    assert_eq!(res.status(), Status::Conflict);
    let res = client
        .post("/reports/missing/favorite")
        .header(auth())
        .dispatch();
    assert_eq!(res.status(), Status::NotFound);

    let res = client.get("/favorites/ids").header(auth()).dispatch();
    assert_eq!(res.status(), Status::Ok);
    let mut ids: Vec<String> = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    ids.sort();
    let mut expected = vec![first.id.clone(), second.id.clone()];
    expected.sort();
    assert_eq!(ids, expected);

    let res = client.get("/favorites").header(auth()).dispatch();
    let favorites: Vec<json::Report> = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    assert_eq!(favorites.len(), 2);

    let res = client
        .delete(format!("/reports/{}/favorite", first.id))
        .header(auth())
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    let res = client
        .delete(format!("/reports/{}/favorite", first.id))
        .header(auth())
        .dispatch();
    assert_eq!(res.status(), Status::NotFound);

    let res = client
        .get("/favorites/ids")
        .header(Header::new("Authorization", backend.bearer("bob")))
        .dispatch();
    let ids: Vec<String> = serde_json::from_str(&res.into_string().unwrap()).unwrap();
    assert!(ids.is_empty());
}

#[test]
fn new_reports_are_pushed_to_nearby_watchers() {
    use spotfinder_core::gateways::broadcast::ReportEvent;

    let (client, backend) = setup();
    let (near, mut rx_near) = backend.hub.open_connection(8);
    let (far, mut rx_far) = backend.hub.open_connection(8);
    let cell = |lat, lng| {
        NearbySubscription {
            pos: MapPoint::from_lat_lng_deg(lat, lng),
            radius: Distance::from_meters(500.0),
        }
        .cell_key()
    };
    backend.hub.subscribe(near, cell(45.5, -73.57));
    backend.hub.subscribe(far, cell(48.85, 2.35));

    let created = post_report(&client, r#"{"lat":45.5001,"lng":-73.5702,"status":"available"}"#);
    let Ok(ReportEvent::Created(report)) = rx_near.try_recv() else {
        panic!("no event delivered");
    };
    assert_eq!(report.id.as_str(), created.id);
    assert!(rx_far.try_recv().is_err());

    rate(&client, &backend, "u1", &created.id, r#"{"value":-1}"#);
    assert!(matches!(
        rx_near.try_recv(),
        Ok(ReportEvent::Rated { total: 1, .. })
    ));
}

#[test]
fn get_version() {
    let (client, _) = setup();
    let res = client.get("/server/version").dispatch();
    assert_eq!(res.status(), Status::Ok);
    assert_eq!(res.into_string().unwrap(), DUMMY_VERSION);
}
