use serde_json::json;

use crate::common::{JSON, PUBLIC_URL, TestApp, routes};

mod list_songs {
    use super::*;

    #[tokio::test]
    async fn empty_collection_returns_empty_array() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::SONGS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.mimetype(), Some(JSON));
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn songs_embed_their_files_in_id_order() {
        let app = TestApp::spawn().await;
        let file_a = app.create_file("Test File 1").await;
        let file_b = app.create_file("Test File 2").await;
        let song_a = app.create_song(file_a).await;
        let song_b = app.create_song(file_b).await;

        let res = app.get(routes::SONGS).await;

        assert_eq!(res.status, 200);
        let songs = res.body.as_array().unwrap();
        assert_eq!(songs.len(), 2);

        assert_eq!(songs[0]["id"], song_a);
        assert_eq!(songs[0]["file"]["id"], file_a);
        assert_eq!(songs[0]["file"]["name"], "Test File 1");
        assert_eq!(
            songs[0]["file"]["path"],
            format!("{PUBLIC_URL}/uploads/Test File 1")
        );

        assert_eq!(songs[1]["id"], song_b);
        assert_eq!(songs[1]["file"]["id"], file_b);
        assert_eq!(songs[1]["file"]["name"], "Test File 2");
    }

    #[tokio::test]
    async fn ids_are_strictly_ascending() {
        let app = TestApp::spawn().await;
        for i in 0..5 {
            let file_id = app.create_file(&format!("f{i}.mp3")).await;
            app.create_song(file_id).await;
        }

        let res = app.get(routes::SONGS).await;

        let ids: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");
    }

    #[tokio::test]
    async fn lists_more_songs_than_a_query_can_bind() {
        let app = TestApp::spawn().await;
        // Above SQLite's 32766 bound-variable ceiling.
        app.seed_songs(33_000).await;

        let res = app.get(routes::SONGS).await;

        assert_eq!(res.status, 200, "{:?}", res.body);
        let songs = res.body.as_array().unwrap();
        assert_eq!(songs.len(), 33_000);
        assert_eq!(songs[0]["id"], 1);
        assert_eq!(songs[32_999]["id"], 33_000);
        assert_eq!(songs[32_999]["file"]["name"], "track33000.mp3");
    }

    #[tokio::test]
    async fn rejects_non_json_accept() {
        let app = TestApp::spawn().await;

        let res = app
            .send(
                app.client
                    .get(format!("http://{}{}", app.addr, routes::SONGS))
                    .header("Accept", "text/html"),
            )
            .await;

        assert_eq!(res.status, 406);
        assert_eq!(res.message(), "Request must accept application/json");
    }

    #[tokio::test]
    async fn missing_accept_header_is_fine() {
        let app = TestApp::spawn().await;

        let res = app.get_raw(routes::SONGS).await;

        assert_eq!(res.status, 200);
    }
}

mod get_song {
    use super::*;

    #[tokio::test]
    async fn returns_song_with_file() {
        let app = TestApp::spawn().await;
        let file_id = app.create_file("track.ogg").await;
        let song_id = app.create_song(file_id).await;

        let res = app.get(&routes::song(song_id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.body,
            json!({
                "id": song_id,
                "file": {
                    "id": file_id,
                    "name": "track.ogg",
                    "path": format!("{PUBLIC_URL}/uploads/track.ogg"),
                }
            })
        );
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let app = TestApp::spawn().await;
        let file_id = app.create_file("same.ogg").await;
        let song_id = app.create_song(file_id).await;

        let first = app.get(&routes::song(song_id)).await;
        let second = app.get(&routes::song(song_id)).await;

        assert_eq!(first.status, 200);
        assert_eq!(first.bytes, second.bytes);
    }

    #[tokio::test]
    async fn unknown_id_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::song(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body, json!({"message": "Could not find song with id 999"}));
    }

    #[tokio::test]
    async fn non_integer_id_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get("/api/songs/abc").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.mimetype(), Some(JSON));
        assert_eq!(res.message(), "Could not find /api/songs/abc");
    }

    #[tokio::test]
    async fn out_of_range_id_names_the_full_path() {
        let app = TestApp::spawn().await;

        let res = app.delete("/api/songs/99999999999").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.message(), "Could not find /api/songs/99999999999");
    }
}

mod add_song {
    use super::*;

    #[tokio::test]
    async fn creates_song_for_existing_file() {
        let app = TestApp::spawn().await;
        let file_id = app.create_file("Test File 1").await;

        let res = app
            .post_json(routes::SONGS, &json!({"file": {"id": file_id}}))
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.mimetype(), Some(JSON));
        assert_eq!(
            res.location.as_deref(),
            Some(format!("{PUBLIC_URL}/api/songs").as_str())
        );
        assert_eq!(res.id(), 1);
        assert_eq!(res.body["file"]["id"], file_id);
        assert_eq!(res.body["file"]["name"], "Test File 1");

        assert_eq!(app.stored_songs().await, vec![(1, file_id)]);
    }

    #[tokio::test]
    async fn missing_file_property_is_422() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::SONGS, &json!({})).await;

        assert_eq!(res.status, 422);
        assert_eq!(res.message(), "'file' is a required property");
        assert!(app.stored_songs().await.is_empty());
    }

    #[tokio::test]
    async fn non_numeric_file_id_is_422() {
        let app = TestApp::spawn().await;
        app.create_file("x.mp3").await;

        let res = app
            .post_json(routes::SONGS, &json!({"file": {"id": "1"}}))
            .await;

        assert_eq!(res.status, 422);
        assert_eq!(res.message(), "\"1\" is not of type 'number'");
    }

    #[tokio::test]
    async fn malformed_json_is_422() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw(routes::SONGS, JSON, JSON, "{\"file\": ")
            .await;

        assert_eq!(res.status, 422);
        assert!(res.body["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_file_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::SONGS, &json!({"file": {"id": 42}}))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.message(), "Could not find file with id 42");
        assert!(app.stored_songs().await.is_empty());
    }

    #[tokio::test]
    async fn fractional_file_id_is_404() {
        let app = TestApp::spawn().await;
        app.create_file("x.mp3").await;

        let res = app
            .post_json(routes::SONGS, &json!({"file": {"id": 1.5}}))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn non_json_body_is_415() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw(routes::SONGS, JSON, "text/plain", "file=1")
            .await;

        assert_eq!(res.status, 415);
        assert_eq!(res.message(), "Request must contain application/json data");
    }

    #[tokio::test]
    async fn accept_is_checked_before_content_type() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw(routes::SONGS, "text/html", "text/plain", "file=1")
            .await;

        assert_eq!(res.status, 406);
    }

    #[tokio::test]
    async fn two_songs_may_share_a_file() {
        let app = TestApp::spawn().await;
        let file_id = app.create_file("shared.mp3").await;

        let first = app
            .post_json(routes::SONGS, &json!({"file": {"id": file_id}}))
            .await;
        let second = app
            .post_json(routes::SONGS, &json!({"file": {"id": file_id}}))
            .await;

        assert_eq!(first.status, 201);
        assert_eq!(second.status, 201);
        assert_ne!(first.id(), second.id());
    }
}

mod edit_song {
    use super::*;

    #[tokio::test]
    async fn replaces_the_referenced_file() {
        let app = TestApp::spawn().await;
        let file1 = app.create_file("File1").await;
        let file2 = app.create_file("File2").await;
        let song_id = app.create_song(file1).await;

        let res = app
            .put_json(&routes::song(song_id), &json!({"file": {"id": file2}}))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.mimetype(), Some(JSON));
        assert_eq!(
            res.location.as_deref(),
            Some(format!("{PUBLIC_URL}/api/songs/{song_id}").as_str())
        );
        assert_eq!(res.id(), song_id);
        assert_eq!(res.body["file"]["id"], file2);
        assert_eq!(res.body["file"]["name"], "File2");

        assert_eq!(app.stored_songs().await, vec![(song_id, file2)]);
    }

    #[tokio::test]
    async fn unknown_song_is_404() {
        let app = TestApp::spawn().await;
        let file_id = app.create_file("File1").await;

        let res = app
            .put_json(&routes::song(999), &json!({"file": {"id": file_id}}))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body, json!({"message": "Could not find song with id 999"}));
    }

    #[tokio::test]
    async fn schema_violation_is_422_and_keeps_song() {
        let app = TestApp::spawn().await;
        let file_id = app.create_file("File1").await;
        let song_id = app.create_song(file_id).await;

        let res = app
            .put_json(&routes::song(song_id), &json!({"file": {}}))
            .await;

        assert_eq!(res.status, 422);
        assert_eq!(res.message(), "'id' is a required property");
        assert_eq!(app.stored_songs().await, vec![(song_id, file_id)]);
    }

    #[tokio::test]
    async fn unknown_file_is_404_and_keeps_song() {
        let app = TestApp::spawn().await;
        let file_id = app.create_file("File1").await;
        let song_id = app.create_song(file_id).await;

        let res = app
            .put_json(&routes::song(song_id), &json!({"file": {"id": 77}}))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.message(), "Could not find file with id 77");
        assert_eq!(app.stored_songs().await, vec![(song_id, file_id)]);
    }
}

mod delete_song {
    use super::*;

    #[tokio::test]
    async fn removes_exactly_one_song() {
        let app = TestApp::spawn().await;
        let file1 = app.create_file("File1").await;
        let file2 = app.create_file("File2").await;
        let file3 = app.create_file("File3").await;
        let song1 = app.create_song(file1).await;
        let song2 = app.create_song(file2).await;
        let song3 = app.create_song(file3).await;

        let res = app.delete(&routes::song(song2)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.mimetype(), Some(JSON));
        assert_eq!(res.id(), song2);
        assert_eq!(
            app.stored_songs().await,
            vec![(song1, file1), (song3, file3)]
        );
        // Files outlive the songs that reference them.
        assert_eq!(app.stored_files().await.len(), 3);

        let gone = app.get(&routes::song(song2)).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn unknown_song_is_404() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::song(5)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.message(), "Could not find song with id 5");
    }
}
