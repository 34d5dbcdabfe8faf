use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .date_time()
        .not_null()
        .extra("DEFAULT CURRENT_TIMESTAMP".to_owned())
        .to_owned()
}

fn id_column<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(id_column(Teachers::Id))
                    .col(
                        ColumnDef::new(Teachers::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Teachers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .col(ColumnDef::new(Teachers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Teachers::Background).text().null())
                    .col(ColumnDef::new(Teachers::PortraitUrl).string().null())
                    .col(ColumnDef::new(Teachers::Specialties).text().null())
                    .col(created_at(Teachers::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(id_column(Courses::Id))
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Courses::Instructor).string().not_null())
                    .col(ColumnDef::new(Courses::Price).double().not_null())
                    .col(ColumnDef::new(Courses::Category).string().not_null())
                    .col(ColumnDef::new(Courses::TeacherId).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(created_at(Courses::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_teacher_id")
                            .from(Courses::Table, Courses::TeacherId)
                            .to(Teachers::Table, Teachers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(id_column(Enrollments::Id))
                    .col(
                        ColumnDef::new(Enrollments::EnrollmentId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Enrollments::CourseId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::FirstName).string().not_null())
                    .col(ColumnDef::new(Enrollments::LastName).string().not_null())
                    .col(ColumnDef::new(Enrollments::Email).string().not_null())
                    .col(ColumnDef::new(Enrollments::Phone).string().null())
                    .col(ColumnDef::new(Enrollments::Company).string().null())
                    .col(
                        ColumnDef::new(Enrollments::AgreeToTerms)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(created_at(Enrollments::CreatedAt))
                    .col(created_at(Enrollments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_course_id")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(id_column(Payments::Id))
                    .col(
                        ColumnDef::new(Payments::PaymentId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::EnrollmentId).string().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Payments::Reference).string().not_null())
                    .col(ColumnDef::new(Payments::TransactionId).string().null())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(created_at(Payments::CreatedAt))
                    .col(ColumnDef::new(Payments::CompletedAt).date_time().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_enrollment_id")
                            .from(Payments::Table, Payments::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::EnrollmentId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(id_column(Admins::Id))
                    .col(
                        ColumnDef::new(Admins::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Admins::Name).string().not_null())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::PasswordSalt).string().not_null())
                    .col(created_at(Admins::CreatedAt))
                    .to_owned(),
            )
            .await?;

        let indexes = [
            ("idx_courses_teacher_id", Courses::Table.into_iden(), Courses::TeacherId.into_iden()),
            ("idx_courses_status", Courses::Table.into_iden(), Courses::Status.into_iden()),
            ("idx_teachers_username", Teachers::Table.into_iden(), Teachers::Username.into_iden()),
            ("idx_teachers_email", Teachers::Table.into_iden(), Teachers::Email.into_iden()),
            ("idx_enrollments_email", Enrollments::Table.into_iden(), Enrollments::Email.into_iden()),
            ("idx_enrollments_course_id", Enrollments::Table.into_iden(), Enrollments::CourseId.into_iden()),
            ("idx_payments_enrollment_id", Payments::Table.into_iden(), Payments::EnrollmentId.into_iden()),
            ("idx_admins_username", Admins::Table.into_iden(), Admins::Username.into_iden()),
        ];

        for (name, table, col) in indexes {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Teachers {
    Table,
    Id,
    Username,
    Email,
    Name,
    PasswordHash,
    Background,
    PortraitUrl,
    Specialties,
    CreatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Title,
    Description,
    ImageUrl,
    Instructor,
    Price,
    Category,
    TeacherId,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    EnrollmentId,
    CourseId,
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    AgreeToTerms,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    PaymentId,
    EnrollmentId,
    Amount,
    PaymentMethod,
    Reference,
    TransactionId,
    Status,
    CreatedAt,
    CompletedAt,
}

#[derive(Iden)]
enum Admins {
    Table,
    Id,
    Username,
    Name,
    PasswordHash,
    PasswordSalt,
    CreatedAt,
}
