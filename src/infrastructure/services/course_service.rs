use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::course::{Course, CourseRepository};
use crate::domain::course_date::{CourseDate, CourseDateRepository};
use crate::domain::image::{Image, ImageOwner};
use crate::domain::DomainError;
use crate::infrastructure::services::image_service::{FileUpload, ImageService};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDateRequest {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    /// Owning provider id; must match the authenticated provider.
    pub provider: i64,
    pub name: String,
    pub instructor: Option<String>,
    pub phone_number: Option<String>,
    pub email: String,
    pub description: String,
    pub price: Decimal,
    pub max_participants: Option<i32>,
    pub category: String,
    pub difficulty: Option<String>,
    pub equipment: Option<String>,
    pub requirements: Option<String>,
    #[serde(default)]
    pub trial_day: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub dates: Vec<CourseDateRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    /// Echo of the path id; the route guard requires them to match.
    pub id: Option<i64>,
    pub name: Option<String>,
    pub instructor: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub max_participants: Option<i32>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub equipment: Option<String>,
    pub requirements: Option<String>,
    pub trial_day: Option<bool>,
    pub is_private: Option<bool>,
    pub is_published: Option<bool>,
    /// When present, replaces the enrollment list.
    pub member_ids: Option<Vec<i64>>,
    /// When present, replaces the course's scheduled dates.
    pub dates: Option<Vec<CourseDateRequest>>,
}

/// Course management for providers plus the public course catalogue.
#[derive(Debug, Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    dates: Arc<dyn CourseDateRepository>,
    images: Arc<ImageService>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        dates: Arc<dyn CourseDateRepository>,
        images: Arc<ImageService>,
    ) -> Self {
        Self {
            courses,
            dates,
            images,
        }
    }

    pub async fn find(&self, id: i64) -> Result<Course, DomainError> {
        self.courses
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Course '{}' not found", id)))
    }

    pub async fn list_published(&self) -> Result<Vec<Course>, DomainError> {
        self.courses.list_published().await
    }

    pub async fn list_for_provider(&self, provider_id: i64) -> Result<Vec<Course>, DomainError> {
        self.courses.list_for_provider(provider_id).await
    }

    pub async fn list_for_member(&self, member_id: i64) -> Result<Vec<Course>, DomainError> {
        self.courses.list_for_member(member_id).await
    }

    pub async fn create(&self, request: CreateCourseRequest) -> Result<Course, DomainError> {
        let course = Course::new(
            request.provider,
            request.name,
            request.instructor,
            request.phone_number,
            request.email,
            request.description,
            request.price,
            request.max_participants,
            request.category,
            request.difficulty,
            request.equipment,
            request.requirements,
            request.trial_day,
            request.is_private,
        )?;

        let course = self.courses.create(course).await?;

        for date in request.dates {
            self.dates
                .create(CourseDate::new(
                    course.id,
                    date.starts_at,
                    date.ends_at,
                    date.street,
                    date.zip,
                    date.city,
                    date.country,
                )?)
                .await?;
        }

        Ok(course)
    }

    pub async fn update(&self, id: i64, request: UpdateCourseRequest) -> Result<Course, DomainError> {
        let mut course = self.find(id).await?;

        if let Some(name) = request.name {
            course.name = name;
        }
        if let Some(instructor) = request.instructor {
            course.instructor = Some(instructor);
        }
        if let Some(phone_number) = request.phone_number {
            course.phone_number = Some(phone_number);
        }
        if let Some(email) = request.email {
            course.email = email;
        }
        if let Some(description) = request.description {
            course.description = description;
        }
        if let Some(price) = request.price {
            course.price = price;
        }
        if let Some(max_participants) = request.max_participants {
            course.max_participants = Some(max_participants);
        }
        if let Some(category) = request.category {
            course.category = category;
        }
        if let Some(difficulty) = request.difficulty {
            course.difficulty = Some(difficulty);
        }
        if let Some(equipment) = request.equipment {
            course.equipment = Some(equipment);
        }
        if let Some(requirements) = request.requirements {
            course.requirements = Some(requirements);
        }
        if let Some(trial_day) = request.trial_day {
            course.trial_day = trial_day;
        }
        if let Some(is_private) = request.is_private {
            course.is_private = is_private;
        }
        if let Some(is_published) = request.is_published {
            course.is_published = is_published;
        }

        course.validate()?;
        self.courses.update(&course).await?;

        if let Some(member_ids) = request.member_ids {
            self.courses.set_members(id, &member_ids).await?;
        }

        if let Some(dates) = request.dates {
            self.dates.delete_for_course(id).await?;
            for date in dates {
                self.dates
                    .create(CourseDate::new(
                        id,
                        date.starts_at,
                        date.ends_at,
                        date.street,
                        date.zip,
                        date.city,
                        date.country,
                    )?)
                    .await?;
            }
        }

        Ok(course)
    }

    /// Delete the course with its dates and slideshow images.
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.find(id).await?;

        self.images
            .delete_for_owner(ImageOwner::Course(id))
            .await?;
        self.dates.delete_for_course(id).await?;

        if !self.courses.delete(id).await? {
            return Err(DomainError::not_found(format!("Course '{}' not found", id)));
        }
        Ok(())
    }

    pub async fn dates(&self, course_id: i64) -> Result<Vec<CourseDate>, DomainError> {
        self.dates.list_for_course(course_id).await
    }

    pub async fn member_ids(&self, course_id: i64) -> Result<Vec<i64>, DomainError> {
        self.courses.member_ids(course_id).await
    }

    pub async fn slideshow(&self, course_id: i64) -> Result<Vec<Image>, DomainError> {
        self.images
            .list_for_owner(ImageOwner::Course(course_id))
            .await
    }

    pub async fn profile_image(&self, course: &Course) -> Result<Option<Image>, DomainError> {
        match course.profile_image_id {
            Some(id) => Ok(Some(self.images.find(id).await?)),
            None => Ok(None),
        }
    }

    pub async fn upload_slideshow_image(
        &self,
        course_id: i64,
        file: &FileUpload,
    ) -> Result<Image, DomainError> {
        self.find(course_id).await?;
        self.images.upload(ImageOwner::Course(course_id), file).await
    }

    pub async fn set_profile_image(
        &self,
        course_id: i64,
        image_id: i64,
    ) -> Result<Image, DomainError> {
        let mut course = self.find(course_id).await?;
        let image = self.images.find(image_id).await?;
        if image.owner != ImageOwner::Course(course_id) {
            return Err(DomainError::not_found(format!(
                "Image '{}' not found",
                image_id
            )));
        }

        course.profile_image_id = Some(image.id);
        self.courses.update(&course).await?;
        Ok(image)
    }

    /// Delete a slideshow image, promoting the first remaining one when the
    /// profile image was removed.
    pub async fn delete_image(&self, course_id: i64, image_id: i64) -> Result<(), DomainError> {
        let mut course = self.find(course_id).await?;

        let image = match self.images.find(image_id).await {
            Ok(image) if image.owner == ImageOwner::Course(course_id) => image,
            _ => {
                return Err(DomainError::validation(
                    "Image could not be found in the slideshow",
                ))
            }
        };

        let was_profile = course.profile_image_id == Some(image.id);
        if was_profile {
            course.profile_image_id = None;
            self.courses.update(&course).await?;
        }
        self.images.delete(&image).await?;

        if was_profile {
            let slideshow = self.slideshow(course_id).await?;
            if let Some(first) = slideshow.first() {
                course.profile_image_id = Some(first.id);
                self.courses.update(&course).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::object_storage::InMemoryObjectStore;
    use crate::infrastructure::repositories::in_memory::{
        InMemoryCourseDateRepository, InMemoryCourseRepository, InMemoryImageRepository,
    };
    use chrono::Duration;

    fn service() -> (CourseService, Arc<InMemoryCourseRepository>) {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let images = Arc::new(ImageService::new(
            Arc::new(InMemoryImageRepository::new()),
            Arc::new(InMemoryObjectStore::new()),
        ));
        let service = CourseService::new(
            courses.clone(),
            Arc::new(InMemoryCourseDateRepository::new()),
            images,
        );
        (service, courses)
    }

    fn create_request() -> CreateCourseRequest {
        let now = Utc::now();
        CreateCourseRequest {
            provider: 1,
            name: "Morning Yoga".to_string(),
            instructor: Some("Lena".to_string()),
            phone_number: None,
            email: "yoga@example.com".to_string(),
            description: "Sun salutations".to_string(),
            price: Decimal::new(1500, 2),
            max_participants: Some(12),
            category: "Sports".to_string(),
            difficulty: Some("Beginner".to_string()),
            equipment: None,
            requirements: None,
            trial_day: true,
            is_private: false,
            dates: vec![CourseDateRequest {
                starts_at: now,
                ends_at: now + Duration::hours(1),
                street: "Main St 1".to_string(),
                zip: "8000".to_string(),
                city: "Zurich".to_string(),
                country: "Switzerland".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_stores_dates() {
        let (service, _) = service();
        let course = service.create(create_request()).await.unwrap();

        let dates = service.dates(course.id).await.unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].city, "Zurich");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_date_range() {
        let (service, _) = service();
        let mut request = create_request();
        request.dates[0].ends_at = request.dates[0].starts_at - Duration::hours(1);

        let result = service.create(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_list_published_needs_published_provider() {
        let (service, courses) = service();
        let course = service.create(create_request()).await.unwrap();
        service
            .update(
                course.id,
                UpdateCourseRequest {
                    is_published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(service.list_published().await.unwrap().is_empty());

        courses.mark_provider_published(1);
        assert_eq!(service.list_published().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_enrollment() {
        let (service, _) = service();
        let course = service.create(create_request()).await.unwrap();

        service
            .update(
                course.id,
                UpdateCourseRequest {
                    member_ids: Some(vec![4, 9]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(service.member_ids(course.id).await.unwrap(), vec![4, 9]);

        service
            .update(
                course.id,
                UpdateCourseRequest {
                    member_ids: Some(vec![9]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(service.member_ids(course.id).await.unwrap(), vec![9]);
    }

    #[tokio::test]
    async fn test_delete_removes_dates_and_images() {
        let (service, _) = service();
        let course = service.create(create_request()).await.unwrap();
        service
            .upload_slideshow_image(
                course.id,
                &FileUpload {
                    file_name: "slide.png".to_string(),
                    bytes: vec![1],
                },
            )
            .await
            .unwrap();

        service.delete(course.id).await.unwrap();

        assert!(service.find(course.id).await.is_err());
        assert!(service.dates(course.id).await.unwrap().is_empty());
        assert!(service.slideshow(course.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_image_promotion() {
        let (service, _) = service();
        let course = service.create(create_request()).await.unwrap();
        let file = FileUpload {
            file_name: "slide.png".to_string(),
            bytes: vec![1],
        };

        let first = service
            .upload_slideshow_image(course.id, &file)
            .await
            .unwrap();
        let second = service
            .upload_slideshow_image(course.id, &file)
            .await
            .unwrap();
        service.set_profile_image(course.id, first.id).await.unwrap();

        service.delete_image(course.id, first.id).await.unwrap();

        let course = service.find(course.id).await.unwrap();
        assert_eq!(course.profile_image_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_delete_missing_image_is_rejected() {
        let (service, _) = service();
        let course = service.create(create_request()).await.unwrap();

        let result = service.delete_image(course.id, 99).await;
        assert!(matches!(
            result,
            Err(DomainError::Validation { message }) if message == "Image could not be found in the slideshow"
        ));
    }
}
