//! School records: one [`Resource`] per table and the route registrar.

use crate::module::Module;
use crate::resource::{Field, Identity, Kind, Lookup, Messages, Resource};
use crate::router::Router;

pub static STUDENTS: Resource = Resource {
    name: "students",
    path: "/students",
    table: "Aluno",
    identity: Identity::Serial("id_aluno"),
    fields: &[
        Field::required("nome_completo", Kind::Text),
        Field::required("data_nascimento", Kind::Date),
        Field::optional("id_turma", Kind::Integer),
        Field::required("nome_responsavel", Kind::Text),
        Field::required("telefone_responsavel", Kind::Text),
        Field::required("email_responsavel", Kind::Text),
        Field::optional("informacoes_adicionais", Kind::Text),
    ],
    messages: Messages {
        created: "Aluno cadastrado com sucesso",
        updated: "Dados do aluno atualizados com sucesso",
        deleted: "Aluno excluído com sucesso",
        not_found: "Aluno não encontrado",
    },
    lookups: &[],
};

pub static TEACHERS: Resource = Resource {
    name: "teachers",
    path: "/teachers",
    table: "Professor",
    identity: Identity::Serial("id_professor"),
    fields: &[
        Field::required("nome_completo", Kind::Text),
        Field::required("email", Kind::Text),
        Field::required("telefone", Kind::Text),
    ],
    messages: Messages {
        created: "Professor cadastrado com sucesso",
        updated: "Dados do professor atualizados com sucesso",
        deleted: "Professor excluído com sucesso",
        not_found: "Professor não encontrado",
    },
    lookups: &[],
};

pub static CLASSES: Resource = Resource {
    name: "classes",
    path: "/classes",
    table: "Turma",
    identity: Identity::Serial("id_turma"),
    fields: &[
        Field::required("nome_turma", Kind::Text),
        Field::optional("id_professor", Kind::Integer),
        Field::required("horario", Kind::Text),
    ],
    messages: Messages {
        created: "Turma cadastrada com sucesso",
        updated: "Dados da turma atualizados com sucesso",
        deleted: "Turma excluída com sucesso",
        not_found: "Turma não encontrada",
    },
    lookups: &[],
};

pub static SUBJECTS: Resource = Resource {
    name: "subjects",
    path: "/subjects",
    table: "Disciplina",
    identity: Identity::Serial("id_disciplina"),
    fields: &[
        Field::required("nome_disciplina", Kind::Text),
        Field::optional("id_professor", Kind::Integer),
    ],
    messages: Messages {
        created: "Disciplina cadastrada com sucesso",
        updated: "Dados da disciplina atualizados com sucesso",
        deleted: "Disciplina excluída com sucesso",
        not_found: "Disciplina não encontrada",
    },
    lookups: &[],
};

pub static ACTIVITIES: Resource = Resource {
    name: "activities",
    path: "/activities",
    table: "Atividade",
    identity: Identity::Serial("id_atividade"),
    fields: &[
        Field::required("descricao", Kind::Text),
        Field::required("data_realizacao", Kind::Date),
    ],
    messages: Messages {
        created: "Atividade cadastrada com sucesso",
        updated: "Dados da atividade atualizados com sucesso",
        deleted: "Atividade excluída com sucesso",
        not_found: "Atividade não encontrada",
    },
    lookups: &[],
};

/// Activity-student link, keyed by the pair.
pub static ACTIVITY_STUDENTS: Resource = Resource {
    name: "activity_students",
    path: "/activity_students",
    table: "Atividades_Alunos",
    identity: Identity::Composite {
        columns: &["id_atividade", "id_aluno"],
        replacement_prefix: "novo_",
    },
    fields: &[
        Field::required("id_atividade", Kind::Integer),
        Field::required("id_aluno", Kind::Integer),
    ],
    messages: Messages {
        created: "Atividade associada ao aluno com sucesso",
        updated: "Associação entre atividade e aluno atualizada com sucesso",
        deleted: "Associação entre atividade e aluno excluída com sucesso",
        not_found: "Associação entre atividade e aluno não encontrada",
    },
    lookups: &[
        Lookup {
            path: "/students/{id_aluno}",
            column: "id_aluno",
            projection: Some(&["id_atividade"]),
            empty: None,
        },
        Lookup {
            path: "/activities/{id_atividade}",
            column: "id_atividade",
            projection: Some(&["id_aluno"]),
            empty: None,
        },
    ],
};

pub static ATTENDANCE: Resource = Resource {
    name: "attendance",
    path: "/attendance",
    table: "Presenca",
    identity: Identity::Serial("id_presenca"),
    fields: &[
        Field::required("id_aluno", Kind::Integer),
        Field::required("data_presenca", Kind::Date),
        Field::required("presente", Kind::Flag),
    ],
    messages: Messages {
        created: "Presença cadastrada com sucesso",
        updated: "Dados da presença atualizados com sucesso",
        deleted: "Presença excluída com sucesso",
        not_found: "Presença não encontrada",
    },
    lookups: &[],
};

/// Per-subject attendance.
pub static FREQUENCIES: Resource = Resource {
    name: "frequencies",
    path: "/frequencies",
    table: "Frequencia",
    identity: Identity::Serial("id_frequencia"),
    fields: &[
        Field::required("id_aluno", Kind::Integer),
        Field::required("id_disciplina", Kind::Integer),
        Field::required("data_aula", Kind::Date),
        Field::required("presente", Kind::Flag),
    ],
    messages: Messages {
        created: "Frequência cadastrada com sucesso",
        updated: "Dados da frequência atualizados com sucesso",
        deleted: "Frequência excluída com sucesso",
        not_found: "Frequência não encontrada",
    },
    lookups: &[Lookup {
        path: "/student/{id_aluno}",
        column: "id_aluno",
        projection: None,
        empty: Some("Nenhuma frequência encontrada para este aluno"),
    }],
};

pub static GRADES: Resource = Resource {
    name: "grades",
    path: "/grades",
    table: "Nota",
    identity: Identity::Serial("id_nota"),
    fields: &[
        Field::required("id_aluno", Kind::Integer),
        Field::required("id_disciplina", Kind::Integer),
        Field::required("valor_nota", Kind::Decimal),
        Field::required("data_avaliacao", Kind::Date),
    ],
    messages: Messages {
        created: "Nota cadastrada com sucesso",
        updated: "Dados da nota atualizados com sucesso",
        deleted: "Nota excluída com sucesso",
        not_found: "Nota não encontrada",
    },
    lookups: &[Lookup {
        path: "/student/{id_aluno}",
        column: "id_aluno",
        projection: None,
        empty: Some("Nenhuma nota encontrada para este aluno"),
    }],
};

pub static PAYMENTS: Resource = Resource {
    name: "payments",
    path: "/payments",
    table: "Pagamento",
    identity: Identity::Serial("id_pagamento"),
    fields: &[
        Field::required("id_aluno", Kind::Integer),
        Field::required("data_pagamento", Kind::Date),
        Field::required("valor_pago", Kind::Decimal),
        Field::required("forma_pagamento", Kind::Text),
        Field::required("referencia", Kind::Text),
        Field::required("status", Kind::Text),
    ],
    messages: Messages {
        created: "Pagamento cadastrado com sucesso",
        updated: "Dados do pagamento atualizados com sucesso",
        deleted: "Pagamento excluído com sucesso",
        not_found: "Pagamento não encontrado",
    },
    lookups: &[],
};

pub static USERS: Resource = Resource {
    name: "users",
    path: "/users",
    table: "Usuarios",
    identity: Identity::Serial("id_usuario"),
    fields: &[
        Field::required("login", Kind::Text),
        Field::required("senha", Kind::Text),
        Field::required("nivel_acesso", Kind::Text),
        Field::optional("id_professor", Kind::Integer),
    ],
    messages: Messages {
        created: "Usuário cadastrado com sucesso",
        updated: "Dados do usuário atualizados com sucesso",
        deleted: "Usuário excluído com sucesso",
        not_found: "Usuário não encontrado",
    },
    lookups: &[],
};

/// Every resource served, in registration order.
pub static RESOURCES: [&Resource; 11] = [
    &STUDENTS,
    &TEACHERS,
    &CLASSES,
    &SUBJECTS,
    &ACTIVITIES,
    &ACTIVITY_STUDENTS,
    &ATTENDANCE,
    &FREQUENCIES,
    &GRADES,
    &PAYMENTS,
    &USERS,
];

/// Bind every resource's routes under the router's prefix.
pub fn register(router: &mut Router) {
    for resource in RESOURCES {
        resource.routes(router);
        tracing::debug!(
            module = resource.name(),
            "Registered {}{}",
            router.prefix(),
            resource.path
        );
    }
}
