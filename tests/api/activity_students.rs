//! Activity-student links: composite keys and foreign-key lookups.

use serde_json::json;

use super::harness::{self, TestApp};

async fn seed(app: &TestApp) {
    for name in ["Ana", "Bruno"] {
        let (status, _) = app
            .post(
                "/api/students",
                &json!({
                    "nome_completo": name,
                    "data_nascimento": "2015-03-01",
                    "nome_responsavel": "Beatriz",
                    "telefone_responsavel": "1199999999",
                    "email_responsavel": "b@x.com"
                }),
            )
            .await;
        assert_eq!(status, 201);
    }
    for descricao in ["Feira de ciências", "Excursão"] {
        let (status, _) = app
            .post(
                "/api/activities",
                &json!({ "descricao": descricao, "data_realizacao": "2024-09-10" }),
            )
            .await;
        assert_eq!(status, 201);
    }
}

#[tokio::test]
async fn link_lifecycle() {
    let app = harness::start().await;
    seed(&app).await;

    let (status, body) = app
        .post("/api/activity_students", &json!({ "id_atividade": 1, "id_aluno": 2 }))
        .await;
    assert_eq!(status, 201);
    assert_eq!(
        body,
        json!({ "message": "Atividade associada ao aluno com sucesso" })
    );

    let (status, body) = app.get("/api/activity_students/1/2").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "id_atividade": 1, "id_aluno": 2 }));

    let (status, body) = app
        .put(
            "/api/activity_students/1/2",
            &json!({ "novo_id_atividade": 2, "novo_id_aluno": 1 }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "message": "Associação entre atividade e aluno atualizada com sucesso" })
    );

    let (status, body) = app.get("/api/activity_students/1/2").await;
    assert_eq!(status, 404);
    assert_eq!(
        body,
        json!({ "error": "Associação entre atividade e aluno não encontrada" })
    );

    let (_, body) = app.get("/api/activity_students").await;
    assert_eq!(body, json!([{ "id_atividade": 2, "id_aluno": 1 }]));

    let (status, body) = app.delete("/api/activity_students/2/1").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "message": "Associação entre atividade e aluno excluída com sucesso" })
    );
    let (_, body) = app.get("/api/activity_students").await;
    assert_eq!(body, json!([]));

    app.stop().await;
}

#[tokio::test]
async fn duplicate_link_is_rejected() {
    let app = harness::start().await;
    seed(&app).await;

    let link = json!({ "id_atividade": 1, "id_aluno": 1 });
    let (status, _) = app.post("/api/activity_students", &link).await;
    assert_eq!(status, 201);
    let (status, body) = app.post("/api/activity_students", &link).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("UNIQUE"), "{body}");

    app.stop().await;
}

#[tokio::test]
async fn update_needs_replacement_keys() {
    let app = harness::start().await;

    let (status, body) = app
        .put(
            "/api/activity_students/1/1",
            &json!({ "id_atividade": 2, "id_aluno": 2 }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({ "error": "Missing required field: novo_id_atividade" })
    );

    app.stop().await;
}

#[tokio::test]
async fn lookups_return_bare_keys() {
    let app = harness::start().await;
    seed(&app).await;

    for (atividade, aluno) in [(1, 1), (2, 1), (1, 2)] {
        let (status, _) = app
            .post(
                "/api/activity_students",
                &json!({ "id_atividade": atividade, "id_aluno": aluno }),
            )
            .await;
        assert_eq!(status, 201);
    }

    let (status, body) = app.get("/api/activity_students/students/1").await;
    assert_eq!(status, 200);
    let mut activities: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            assert_eq!(item.as_object().unwrap().len(), 1);
            item["id_atividade"].as_i64().unwrap()
        })
        .collect();
    activities.sort_unstable();
    assert_eq!(activities, vec![1, 2]);

    let (status, body) = app.get("/api/activity_students/activities/2").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([{ "id_aluno": 1 }]));

    // Empty lookups of bare keys are not an error
    let (status, body) = app.get("/api/activity_students/students/99").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));

    app.stop().await;
}
