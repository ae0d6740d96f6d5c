// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::Path;

use tempfile::tempdir;
use tweetrs::application::use_cases::retrieve_tweets_use_case::RetrieveTweetsUseCase;
use tweetrs::config::settings::OutputSettings;
use tweetrs::domain::models::tweet_record::OUTPUT_COLUMNS;
use tweetrs::engines::traits::EngineError;
use tweetrs::infrastructure::csv_sink::CsvRecordSink;
use tweetrs::utils::errors::PipelineError;

use crate::helpers::mock_collaborators::{
    detail_body, detail_service, post, MockPostLister, MockTransport, Page,
};

fn output_settings(path: &Path) -> OutputSettings {
    OutputSettings {
        path: path.to_string_lossy().into_owned(),
        delimiter: ",".to_string(),
    }
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[tokio::test]
async fn test_run_writes_one_row_per_post_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.csv");

    let posts = vec![post("1"), post("2"), post("3")];
    let transport = MockTransport::new(vec![
        (posts[0].url.as_str(), Page::Detail(detail_body("first", 10))),
        (posts[1].url.as_str(), Page::NoDetail),
        (posts[2].url.as_str(), Page::Detail(detail_body("third", 30))),
    ]);
    let use_case = RetrieveTweetsUseCase::new(
        MockPostLister::new(posts.clone()),
        detail_service(transport.clone()),
        "elonmusk",
        &output_settings(&path),
    );

    let report = use_case.run().await.unwrap();
    assert_eq!(report.written, 3);
    assert_eq!(report.with_detail, 2);
    assert_eq!(report.identifier_only, 1);

    let (headers, rows) = read_rows(&path);
    assert_eq!(headers, OUTPUT_COLUMNS.to_vec());
    assert_eq!(rows.len(), 3);

    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    // 详情字段已合并
    assert_eq!(rows[0][1], "Mon Sep 11 12:00:00 +0000 2023");
    assert_eq!(rows[0][2], "10");
    assert_eq!(rows[0][7], "first");
    assert_eq!(rows[0][8], "false");
    assert_eq!(rows[0][14], "1000");
    assert_eq!(rows[2][2], "30");

    // 没有详情响应的帖子只保留ID
    assert_eq!(rows[1].len(), 15);
    assert!(rows[1][1..].iter().all(String::is_empty));

    assert_eq!(
        transport.requested(),
        posts.iter().map(|p| p.url.clone()).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_crash_exhaustion_aborts_and_keeps_written_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.csv");

    let posts = vec![post("1"), post("2"), post("3")];
    let transport = MockTransport::new(vec![
        (posts[0].url.as_str(), Page::Detail(detail_body("first", 10))),
        (posts[1].url.as_str(), Page::Crash),
        (posts[2].url.as_str(), Page::Detail(detail_body("third", 30))),
    ]);
    let use_case = RetrieveTweetsUseCase::new(
        MockPostLister::new(posts.clone()),
        detail_service(transport.clone()),
        "elonmusk",
        &output_settings(&path),
    );

    let err = use_case.run().await.unwrap_err();
    match err {
        PipelineError::Transport {
            rows_written,
            source: EngineError::TransportCrash { url, attempts },
        } => {
            assert_eq!(rows_written, 1);
            assert_eq!(url, posts[1].url);
            assert_eq!(attempts, 4);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let (_, rows) = read_rows(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "1");

    let requested = transport.requested();
    assert_eq!(requested.len(), 1 + 4);
    assert!(!requested.contains(&posts[2].url));
}

#[tokio::test]
async fn test_unwritable_output_fails_before_scraping() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("tweets.csv");

    let posts = vec![post("1")];
    let transport = MockTransport::new(vec![(
        posts[0].url.as_str(),
        Page::Detail(detail_body("first", 10)),
    )]);
    let use_case = RetrieveTweetsUseCase::new(
        MockPostLister::new(posts),
        detail_service(transport.clone()),
        "elonmusk",
        &output_settings(&path),
    );

    let err = use_case.run().await.unwrap_err();
    assert!(matches!(err, PipelineError::SinkUnavailable { .. }));
    assert!(transport.requested().is_empty());
}

#[tokio::test]
async fn test_lister_failure_propagates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.csv");

    let transport = MockTransport::new(vec![]);
    let use_case = RetrieveTweetsUseCase::new(
        MockPostLister::failing(),
        detail_service(transport.clone()),
        "nobody",
        &output_settings(&path),
    );

    let err = use_case.run().await.unwrap_err();
    assert!(matches!(err, PipelineError::Lister(_)));
    assert!(!path.exists());
    assert!(transport.requested().is_empty());
}

#[tokio::test]
async fn test_empty_listing_writes_header_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.csv");

    let use_case = RetrieveTweetsUseCase::new(
        MockPostLister::new(vec![]),
        detail_service(MockTransport::new(vec![])),
        "elonmusk",
        &output_settings(&path),
    );

    let report = use_case.run().await.unwrap();
    assert_eq!(report.written, 0);

    let (headers, rows) = read_rows(&path);
    assert_eq!(headers.len(), 15);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_process_into_memory_sink() {
    let posts = vec![post("42")];
    let transport = MockTransport::new(vec![(
        posts[0].url.as_str(),
        Page::Detail(detail_body("hello, world", 5)),
    )]);
    let use_case = RetrieveTweetsUseCase::new(
        MockPostLister::new(vec![]),
        detail_service(transport),
        "elonmusk",
        &OutputSettings {
            path: String::new(),
            delimiter: ",".to_string(),
        },
    );

    let mut sink = CsvRecordSink::from_writer(Vec::new(), b',').unwrap();
    let report = use_case.process(&posts, &mut sink).await.unwrap();
    assert_eq!(report.written, 1);

    let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("42,"));
    assert!(lines[1].contains("\"hello, world\""));
}
