//! Built-in sample data shown whenever the backend is unreachable, returns an
//! error, or has nothing yet.

use crate::models::{
    Application, ApplicationStatus, Badge, Conversation, LeaderboardEntry, Mentor, Message,
    ParticipantType, Project, ProjectType, Reward,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

struct ProjectSeed<'a> {
    id: &'a str,
    title: &'a str,
    organization: &'a str,
    mentor: &'a str,
    duration: &'a str,
    project_type: ProjectType,
    skills: &'a [&'a str],
    description: &'a str,
    applications: u32,
    posted_date: &'a str,
}

impl ProjectSeed<'_> {
    fn build(&self) -> Project {
        Project {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            organization: self.organization.to_string(),
            duration: self.duration.to_string(),
            project_type: self.project_type,
            skills: strings(self.skills),
            mentor: Some(self.mentor.to_string()),
            applications: self.applications,
            posted_date: self.posted_date.to_string(),
        }
    }
}

const PROJECTS: [ProjectSeed<'static>; 9] = [
    ProjectSeed {
        id: "1",
        title: "Develop a Marketing Strategy for a New Product Launch",
        organization: "TechStart Inc.",
        mentor: "Sarah Johnson",
        duration: "4 weeks",
        project_type: ProjectType::Remote,
        skills: &["Marketing Strategy", "Market Research", "Content Creation"],
        description: "Help our startup develop a comprehensive marketing strategy for our new product launch. You'll work directly with our marketing team to analyze market trends, identify target audiences, and create compelling content.",
        applications: 12,
        posted_date: "2 days ago",
    },
    ProjectSeed {
        id: "2",
        title: "Analyze Customer Feedback for Product Improvement",
        organization: "GreenTech Solutions",
        mentor: "David Chen",
        duration: "3 weeks",
        project_type: ProjectType::Hybrid,
        skills: &["Data Analysis", "Customer Research", "Excel"],
        description: "Analyze customer feedback data to provide insights for product improvement. Work with our product team to identify patterns and recommend actionable improvements.",
        applications: 8,
        posted_date: "5 days ago",
    },
    ProjectSeed {
        id: "3",
        title: "Create a Social Media Campaign for a New Product Launch",
        organization: "EcoFriendly Co.",
        mentor: "Emily Rodriguez",
        duration: "2 weeks",
        project_type: ProjectType::Remote,
        skills: &["Social Media", "Content Creation", "Digital Marketing"],
        description: "Design and implement a social media campaign for our eco-friendly product launch. Create engaging content across multiple platforms.",
        applications: 15,
        posted_date: "1 week ago",
    },
    ProjectSeed {
        id: "4",
        title: "Mobile App Development for Educational Platform",
        organization: "TechForGood Inc.",
        mentor: "Sarah Johnson",
        duration: "3 months",
        project_type: ProjectType::Remote,
        skills: &["React Native", "JavaScript", "Firebase", "UI/UX Design"],
        description: "Develop a React Native mobile application to help underprivileged students access educational resources offline.",
        applications: 9,
        posted_date: "1 week ago",
    },
    ProjectSeed {
        id: "5",
        title: "Data Analysis for Environmental Impact Study",
        organization: "Green Earth NGO",
        mentor: "Dr. Maria Garcia",
        duration: "2 months",
        project_type: ProjectType::Hybrid,
        skills: &["Python", "Data Science", "Pandas", "Matplotlib"],
        description: "Analyze environmental data to create insights for sustainable farming practices in rural communities.",
        applications: 6,
        posted_date: "2 weeks ago",
    },
    ProjectSeed {
        id: "6",
        title: "Website Redesign for Mental Health Awareness",
        organization: "MindCare Foundation",
        mentor: "Jennifer Lee",
        duration: "6 weeks",
        project_type: ProjectType::Remote,
        skills: &["React", "TypeScript", "Tailwind CSS", "Accessibility"],
        description: "Redesign website to improve accessibility and user experience for mental health resources and support.",
        applications: 11,
        posted_date: "3 days ago",
    },
    ProjectSeed {
        id: "7",
        title: "AI Chatbot for Customer Support",
        organization: "InnovateX Startup",
        mentor: "Michael Chang",
        duration: "4 months",
        project_type: ProjectType::OnSite,
        skills: &["Python", "NLP", "Machine Learning", "TensorFlow"],
        description: "Build an intelligent chatbot using NLP to handle customer inquiries and improve response times.",
        applications: 20,
        posted_date: "2 weeks ago",
    },
    ProjectSeed {
        id: "8",
        title: "E-Learning Platform for Rural Education",
        organization: "Educate India NGO",
        mentor: "Priya Sharma",
        duration: "8 weeks",
        project_type: ProjectType::Hybrid,
        skills: &["Vue.js", "Node.js", "Progressive Web Apps", "MongoDB"],
        description: "Create an offline-first e-learning platform to deliver quality education to remote rural areas.",
        applications: 7,
        posted_date: "4 days ago",
    },
    ProjectSeed {
        id: "9",
        title: "Blockchain Solution for Supply Chain",
        organization: "FairTrade Cooperative",
        mentor: "Robert Kim",
        duration: "5 months",
        project_type: ProjectType::Remote,
        skills: &["Solidity", "Ethereum", "Web3.js", "JavaScript"],
        description: "Develop blockchain-based tracking system to ensure transparency in fair trade supply chains.",
        applications: 4,
        posted_date: "6 days ago",
    },
];

pub fn projects() -> Vec<Project> {
    PROJECTS.iter().map(ProjectSeed::build).collect()
}

pub fn project(id: &str) -> Option<Project> {
    PROJECTS
        .iter()
        .find(|seed| seed.id == id)
        .map(ProjectSeed::build)
}

/// Applications reference the sample projects 4 through 9.
pub fn applications() -> Vec<Application> {
    let statuses = [
        ("1", "4", ApplicationStatus::UnderReview, "2024-01-15"),
        ("2", "5", ApplicationStatus::Accepted, "2024-01-10"),
        ("3", "6", ApplicationStatus::InterviewScheduled, "2024-01-12"),
        ("4", "7", ApplicationStatus::Rejected, "2024-01-08"),
        ("5", "8", ApplicationStatus::UnderReview, "2024-01-14"),
        ("6", "9", ApplicationStatus::UnderReview, "2024-01-13"),
    ];
    statuses
        .into_iter()
        .filter_map(|(id, project_id, status, applied_date)| {
            let project = project(project_id)?;
            Some(Application {
                id: id.to_string(),
                project_id: Some(project.id),
                project: project.title,
                organization: project.organization,
                status,
                applied_date: applied_date.to_string(),
                skills: project.skills,
                project_type: project.project_type,
                duration: project.duration,
                description: project.description,
                mentor: project.mentor,
            })
        })
        .collect()
}

pub fn conversations() -> Vec<Conversation> {
    let conversation = |id: u32,
                        participant_id: &str,
                        participant_name: &str,
                        participant_type: ParticipantType,
                        last_message: &str,
                        last_message_time: &str,
                        unread_count: u32,
                        online: bool,
                        project_context: &str| Conversation {
        id,
        participant_id: participant_id.to_string(),
        participant_name: participant_name.to_string(),
        participant_type,
        last_message: last_message.to_string(),
        last_message_time: last_message_time.to_string(),
        unread_count,
        online,
        project_context: Some(project_context.to_string()),
    };

    vec![
        conversation(
            1,
            "mentor_001",
            "Sarah Johnson",
            ParticipantType::Mentor,
            "Great progress on the React components! Let me know if you need help with the state management.",
            "2 min ago",
            2,
            true,
            "Mobile App Development",
        ),
        conversation(
            2,
            "org_001",
            "TechForGood Inc.",
            ParticipantType::Organization,
            "We'd like to schedule an interview for the mobile app project. Are you available this week?",
            "1 hour ago",
            1,
            false,
            "Educational Platform Project",
        ),
        conversation(
            3,
            "mentor_002",
            "Dr. Michael Chen",
            ParticipantType::Mentor,
            "The data analysis approach looks solid. Have you considered using clustering algorithms?",
            "3 hours ago",
            0,
            true,
            "Environmental Impact Study",
        ),
        conversation(
            4,
            "student_001",
            "Alex Rodriguez",
            ParticipantType::Student,
            "Thanks for the collaboration on the blockchain project! The smart contract is working perfectly.",
            "1 day ago",
            0,
            false,
            "Supply Chain Transparency",
        ),
        conversation(
            5,
            "org_002",
            "Green Earth NGO",
            ParticipantType::Organization,
            "Your application has been reviewed. We're impressed with your portfolio!",
            "2 days ago",
            0,
            false,
            "Environmental Data Analysis",
        ),
    ]
}

pub const CURRENT_USER_ID: &str = "current_user";

/// The one sample thread; every conversation opens onto it.
pub fn thread() -> Vec<Message> {
    let mentor = |id: u32, content: &str, timestamp: &str, read: bool| Message {
        id,
        sender_id: "mentor_001".to_string(),
        sender_name: "Sarah Johnson".to_string(),
        sender_type: ParticipantType::Mentor,
        content: content.to_string(),
        timestamp: timestamp.to_string(),
        read,
    };
    let me = |id: u32, content: &str, timestamp: &str| Message {
        id,
        sender_id: CURRENT_USER_ID.to_string(),
        sender_name: "You".to_string(),
        sender_type: ParticipantType::Student,
        content: content.to_string(),
        timestamp: timestamp.to_string(),
        read: true,
    };

    vec![
        mentor(
            1,
            "Hi! I've reviewed your latest code submission for the mobile app project.",
            "10:30 AM",
            true,
        ),
        me(
            2,
            "Thank you! I was wondering about the best approach for handling user authentication.",
            "10:32 AM",
        ),
        mentor(
            3,
            "Great question! For this project, I'd recommend using Firebase Auth. It's secure and well-documented.",
            "10:35 AM",
            true,
        ),
        mentor(
            4,
            "I'll send you some resources and examples that might help.",
            "10:36 AM",
            true,
        ),
        me(
            5,
            "That would be amazing! I really appreciate your guidance.",
            "10:38 AM",
        ),
        mentor(
            6,
            "Great progress on the React components! Let me know if you need help with the state management.",
            "2 min ago",
            false,
        ),
    ]
}

pub fn mentors() -> Vec<Mentor> {
    let mentor = |id: u32,
                  name: &str,
                  title: &str,
                  location: &str,
                  experience: &str,
                  rating: f32,
                  total_reviews: u32,
                  total_mentees: u32,
                  expertise: &[&str],
                  bio: &str| Mentor {
        id,
        name: name.to_string(),
        title: title.to_string(),
        location: location.to_string(),
        experience: experience.to_string(),
        rating,
        total_reviews,
        total_mentees,
        expertise: strings(expertise),
        bio: bio.to_string(),
    };

    vec![
        mentor(
            1,
            "Ethan Carter",
            "Senior Marketing Manager at TechStart Inc.",
            "San Francisco, CA",
            "8 years",
            4.8,
            47,
            156,
            &["Product Management", "Digital Marketing", "Startup Strategy"],
            "I am a senior product manager with a passion for helping innovative startups. Product-market fit, growth hacking and go-to-market strategy from day 1 up to seed series is where I make most impact.",
        ),
        mentor(
            2,
            "Sophia Rodriguez",
            "Lead Software Engineer at Meta",
            "Seattle, WA",
            "10 years",
            4.9,
            62,
            203,
            &["React & JavaScript", "Node.js & Backend", "Cloud Architecture"],
            "Full-stack engineer who enjoys pairing with students on their first production codebase.",
        ),
        mentor(
            3,
            "Marcus Thompson",
            "Data Science Director at Google",
            "Austin, TX",
            "12 years",
            4.7,
            38,
            89,
            &["Machine Learning", "Deep Learning", "Data Analytics"],
            "Leads applied ML teams and mentors students moving from notebooks to shipped models.",
        ),
        mentor(
            4,
            "Jessica Kim",
            "UX Design Lead at Adobe",
            "Los Angeles, CA",
            "7 years",
            4.9,
            54,
            127,
            &["User Experience Design", "Design Systems", "User Research"],
            "Design lead focused on research-driven product design and accessible design systems.",
        ),
        mentor(
            5,
            "David Chen",
            "Cybersecurity Consultant & CISO",
            "New York, NY",
            "15 years",
            4.8,
            29,
            67,
            &["Penetration Testing", "Security Architecture", "Ethical Hacking"],
            "Security consultant helping students build a practical, hands-on security mindset.",
        ),
    ]
}

pub fn mentor(id: u32) -> Option<Mentor> {
    mentors().into_iter().find(|mentor| mentor.id == id)
}

pub fn leaderboard() -> Vec<LeaderboardEntry> {
    let rows: [(&str, u32, u32, Option<Badge>); 10] = [
        ("Sophia Chen", 12, 1250, Some(Badge::Gold)),
        ("Ethan Rodriguez", 10, 1180, Some(Badge::Silver)),
        ("Maya Johnson", 9, 1050, Some(Badge::Bronze)),
        ("Alex Kim", 8, 950, None),
        ("Liam Parker", 7, 890, None),
        ("Zoe Williams", 6, 820, None),
        ("Noah Garcia", 6, 780, None),
        ("Isabella Scott", 5, 720, None),
        ("Oliver Brown", 5, 680, None),
        ("Ava Davis", 4, 640, None),
    ];
    rows.into_iter()
        .zip(1..)
        .map(|((name, projects, points, badge), rank)| LeaderboardEntry {
            rank,
            name: name.to_string(),
            projects,
            points,
            badge,
        })
        .collect()
}

pub fn rewards() -> Vec<Reward> {
    [
        ("Best Internship Handbook", "Physical Reward"),
        ("SkillBridge Cap", "Wearable"),
        ("Premium Journal", "Bonus Award"),
    ]
    .into_iter()
    .map(|(name, kind)| Reward {
        name: name.to_string(),
        kind: kind.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn project_ids_are_unique() {
        let projects = projects();
        let ids: HashSet<_> = projects.iter().map(|project| project.id.as_str()).collect();
        assert_eq!(ids.len(), projects.len());
    }

    #[test]
    fn every_application_points_at_a_sample_project() {
        let applications = applications();
        assert_eq!(applications.len(), 6);
        for application in &applications {
            let project_id = application.project_id.as_deref().expect("sample has project id");
            let project = project(project_id).expect("referenced project exists");
            assert_eq!(project.title, application.project);
        }
    }

    #[test]
    fn leaderboard_is_ranked_by_points() {
        let entries = leaderboard();
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[9].rank, 10);
        assert!(entries.windows(2).all(|pair| pair[0].points >= pair[1].points));
    }

    #[test]
    fn thread_ids_are_sequential() {
        let thread = thread();
        let ids: Vec<u32> = thread.iter().map(|message| message.id).collect();
        assert_eq!(ids, (1..=6).collect::<Vec<_>>());
    }
}
